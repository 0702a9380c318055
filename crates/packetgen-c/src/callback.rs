//! Callback ids, typed handler registration, dispatch wrappers and the
//! `create` function that installs them.
//!
//! Each callback gets its own handler typedef and registration function,
//! so a handler with the wrong argument list is rejected by the C compiler
//! instead of being cast at dispatch time. Registering `NULL` clears the
//! slot. A wrapper whose slot is empty still reports the frame as consumed.

use std::fmt::Write;

use packetgen_schema::{Device, Packet};
use packetgen_wire::{FrameKind, PacketLayout};

use crate::frame::{needs_index, struct_name, unmarshal};
use crate::types::{
    c_type, callback_parameter_list, comment_body, declarator, string_literal, DeviceNames, Locals,
};
use crate::Result;

fn callback_macro(names: &DeviceNames, packet: &Packet) -> String {
    format!("{}_CALLBACK_{}", names.upper, packet.upper_case_name())
}

fn handler_type(names: &DeviceNames, packet: &Packet) -> String {
    format!("{}_{}_func_t", names.var, packet.underscore_name())
}

fn register_signature(names: &DeviceNames, packet: &Packet) -> String {
    format!(
        "void {0}_register_{1}_callback({2} *{0}, {3} callback)",
        names.var,
        packet.underscore_name(),
        names.ty,
        handler_type(names, packet)
    )
}

fn create_signature(names: &DeviceNames) -> String {
    format!("void {0}_create({1} *{0}, const char *uid)", names.var, names.ty)
}

/// Callback id defines with their documentation.
pub fn callback_defines(device: &Device, names: &DeviceNames, lang: &str) -> Result<String> {
    let mut out = String::new();
    for packet in device.callbacks() {
        writeln!(out)?;
        writeln!(out, "/**")?;
        writeln!(out, " * \\ingroup {}", names.group)?;
        writeln!(out, " *")?;
        writeln!(out, "{}", comment_body(packet.doc().text_for(lang)))?;
        writeln!(out, " */")?;
        writeln!(
            out,
            "#define {} {}",
            callback_macro(names, packet),
            packet.function_id()
        )?;
    }
    Ok(out)
}

/// One handler typedef per callback.
pub fn handler_typedefs(device: &Device, names: &DeviceNames) -> Result<String> {
    let mut out = String::new();
    for packet in device.callbacks() {
        writeln!(
            out,
            "typedef void (*{})({});",
            handler_type(names, packet),
            callback_parameter_list(packet)
        )?;
    }
    Ok(out)
}

/// Prototypes of `create` and the registration functions.
pub fn declarations(device: &Device, names: &DeviceNames) -> Result<String> {
    let mut out = String::new();
    writeln!(out)?;
    writeln!(out, "/**")?;
    writeln!(out, " * \\ingroup {}", names.group)?;
    writeln!(out, " *")?;
    writeln!(
        out,
        " * Creates an object with the unique device ID \\c uid. This object can then be"
    )?;
    writeln!(out, " * added to the IP connection.")?;
    writeln!(out, " */")?;
    writeln!(out, "{};", create_signature(names))?;

    for packet in device.callbacks() {
        writeln!(out)?;
        writeln!(out, "/**")?;
        writeln!(out, " * \\ingroup {}", names.group)?;
        writeln!(out, " *")?;
        writeln!(
            out,
            " * Registers \\c callback for {{@link {}}}. Passing NULL unregisters it.",
            callback_macro(names, packet)
        )?;
        writeln!(out, " */")?;
        writeln!(out, "{};", register_signature(names, packet))?;
    }
    Ok(out)
}

/// Dispatch wrapper for one callback packet.
///
/// The wrapper copies the frame out of the read buffer, converts it to
/// host order and calls the handler with the values in declared order.
pub fn wrapper(names: &DeviceNames, packet: &Packet, layout: &PacketLayout) -> Result<String> {
    let mut out = String::new();
    let Some(frame) = layout.callback() else {
        return Ok(out);
    };
    let dev = &names.var;
    let locals = Locals::new(names, packet);
    let callback_struct = struct_name(&layout.name, FrameKind::Callback);

    writeln!(out)?;
    writeln!(
        out,
        "static int {0}_callback_wrapper_{1}({2} *{0}, const unsigned char *buffer) {{",
        dev,
        packet.underscore_name(),
        names.ty
    )?;
    writeln!(
        out,
        "\t{0} {1} = ({0}){2}->registered_callbacks[{3}];",
        handler_type(names, packet),
        locals.handler,
        dev,
        callback_macro(names, packet)
    )?;
    writeln!(out, "\t{} {};", callback_struct, locals.frame)?;
    for element in packet.all_elements() {
        writeln!(
            out,
            "\t{};",
            declarator(c_type(element.ty()), element.name(), element.ty(), element.count())
        )?;
    }
    if needs_index(frame) {
        writeln!(out, "\tint {};", locals.index)?;
    }
    writeln!(out)?;

    writeln!(out, "\tif ({} == NULL) {{", locals.handler)?;
    writeln!(out, "\t\treturn sizeof({});", callback_struct)?;
    writeln!(out, "\t}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "\tmemcpy(&{}, buffer, sizeof({}));",
        locals.frame, callback_struct
    )?;
    let member = format!("{}.", locals.frame);
    for (slot, element) in frame.slots.iter().zip(packet.all_elements()) {
        writeln!(
            out,
            "\t{}",
            unmarshal(&member, slot, element.name(), false, &locals.index)
        )?;
    }
    writeln!(out)?;

    let args: Vec<&str> = packet.all_elements().iter().map(|e| e.name()).collect();
    writeln!(out, "\t{}({});", locals.handler, args.join(", "))?;
    writeln!(out)?;
    writeln!(out, "\treturn sizeof({});", callback_struct)?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Registration function definitions.
pub fn register_definitions(device: &Device, names: &DeviceNames) -> Result<String> {
    let mut out = String::new();
    for packet in device.callbacks() {
        writeln!(out)?;
        writeln!(out, "{} {{", register_signature(names, packet))?;
        writeln!(
            out,
            "\t{}->registered_callbacks[{}] = (IPConCallback)callback;",
            names.var,
            callback_macro(names, packet)
        )?;
        writeln!(out, "}}")?;
    }
    Ok(out)
}

/// `create`: identity, binding version and the wrapper table.
pub fn create_definition(device: &Device, names: &DeviceNames) -> Result<String> {
    let dev = &names.var;
    let mut out = String::new();
    writeln!(out)?;
    writeln!(out, "{} {{", create_signature(names))?;
    writeln!(out, "\tipcon_device_create({}, uid);", dev)?;
    writeln!(out)?;
    writeln!(
        out,
        "\t{}->expected_name = {};",
        dev,
        string_literal(&device.expected_name())
    )?;
    writeln!(out)?;
    for (i, part) in device.version().iter().enumerate() {
        writeln!(out, "\t{}->binding_version[{}] = {};", dev, i, part)?;
    }
    if device.callback_count() > 0 {
        writeln!(out)?;
    }
    for packet in device.callbacks() {
        writeln!(
            out,
            "\t{0}->callback_wrappers[{1}] = {0}_callback_wrapper_{2};",
            dev,
            callback_macro(names, packet),
            packet.underscore_name()
        )?;
    }
    writeln!(out, "}}")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetgen_schema::load_device_from_str;
    use packetgen_wire::DeviceLayout;

    const SCHEMA: &str = r#"
category: Bricklet
name: Motion
display_name: Motion "Pro"
version: [1, 4, 2]
packets:
  - type: function
    function_id: 1
    name: GetAxes
    elements:
      - [axes, int16, 3, out]
  - type: callback
    function_id: 12
    name: Axes
    elements:
      - [axes, uint16, 3]
      - [moving, bool, 1]
      - [label, string, 4]
    doc:
      text:
        en: Triggered periodically.
  - type: callback
    function_id: 13
    name: Tap
"#;

    fn fixture() -> (Device, DeviceLayout, DeviceNames) {
        let device = load_device_from_str(SCHEMA).expect("schema loads");
        let layout = DeviceLayout::resolve(&device).expect("layout resolves");
        let names = DeviceNames::new(&device);
        (device, layout, names)
    }

    #[test]
    fn test_callback_defines() {
        let (device, _, names) = fixture();
        let defines = callback_defines(&device, &names, "en").unwrap();
        assert!(defines.contains("#define MOTION_CALLBACK_AXES 12"));
        assert!(defines.contains("#define MOTION_CALLBACK_TAP 13"));
        assert!(defines.contains(" * Triggered periodically."));
        assert!(!defines.contains("GET_AXES"));
    }

    #[test]
    fn test_typed_registration() {
        let (device, _, names) = fixture();
        let typedefs = handler_typedefs(&device, &names).unwrap();
        assert!(typedefs.contains(
            "typedef void (*motion_axes_func_t)(uint16_t axes[3], bool moving, char label[4]);"
        ));
        assert!(typedefs.contains("typedef void (*motion_tap_func_t)(void);"));

        let decls = declarations(&device, &names).unwrap();
        assert!(decls.contains(
            "void motion_register_axes_callback(Motion *motion, motion_axes_func_t callback);"
        ));
        assert!(decls.contains("void motion_create(Motion *motion, const char *uid);"));
    }

    #[test]
    fn test_wrapper_unpacks_and_skips_when_unregistered() {
        let (device, layout, names) = fixture();
        let packet = device.packet(12).unwrap();
        let code = wrapper(&names, packet, layout.packet(12).unwrap()).unwrap();

        assert!(code.contains(
            "static int motion_callback_wrapper_axes(Motion *motion, const unsigned char *buffer) {"
        ));
        assert!(code.contains(
            "motion_axes_func_t callback = (motion_axes_func_t)motion->registered_callbacks[MOTION_CALLBACK_AXES];"
        ));
        assert!(code.contains(
            "for (i = 0; i < 3; i++) axes[i] = ipcon_leconvert_uint16_from(ac.axes[i]);"
        ));
        assert!(code.contains("moving = ac.moving != 0;"));
        assert!(code.contains("strncpy(label, ac.label, 4);"));
        assert!(code.contains("callback(axes, moving, label);"));

        let null_check = code.find("if (callback == NULL)").unwrap();
        let copy = code.find("memcpy(&ac").unwrap();
        assert!(null_check < copy);
        assert_eq!(code.matches("return sizeof(AxesCallback_);").count(), 2);
    }

    #[test]
    fn test_create_installs_wrappers() {
        let (device, _, names) = fixture();
        let code = create_definition(&device, &names).unwrap();
        assert!(code.contains("motion->expected_name = \"Motion \\\"Pro\\\" Bricklet\";"));
        assert!(code.contains("motion->binding_version[1] = 4;"));
        assert!(code.contains(
            "motion->callback_wrappers[MOTION_CALLBACK_AXES] = motion_callback_wrapper_axes;"
        ));
        assert!(code.contains(
            "motion->callback_wrappers[MOTION_CALLBACK_TAP] = motion_callback_wrapper_tap;"
        ));

        let registers = register_definitions(&device, &names).unwrap();
        assert!(registers.contains(
            "motion->registered_callbacks[MOTION_CALLBACK_TAP] = (IPConCallback)callback;"
        ));
    }
}
