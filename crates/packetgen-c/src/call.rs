//! Synchronous call functions.
//!
//! Every generated call follows the same sequence: check the handle is
//! attached (no I/O otherwise), take the device write mutex, build and
//! send the request, wait for the response if the function has outputs,
//! unpack it, and release the mutex on every path out.

use std::fmt::Write;

use packetgen_schema::{Device, Direction, Packet};
use packetgen_wire::{FrameKind, PacketLayout};

use crate::frame::{marshal, needs_index, struct_name, unmarshal};
use crate::types::{comment_body, parameter_list, DeviceNames, Locals};
use crate::Result;

/// `#define FUNCTION_<NAME> <id>` for every function packet.
pub fn function_id_defines(device: &Device) -> Result<String> {
    let mut out = String::new();
    for packet in device.functions() {
        writeln!(
            out,
            "#define FUNCTION_{} {}",
            packet.upper_case_name(),
            packet.function_id()
        )?;
    }
    Ok(out)
}

/// Prototypes with doc comments for every function packet and `get_version`.
pub fn declarations(device: &Device, names: &DeviceNames, lang: &str) -> Result<String> {
    let mut out = String::new();
    for packet in device.functions() {
        writeln!(out)?;
        writeln!(out, "/**")?;
        writeln!(out, " * \\ingroup {}", names.group)?;
        writeln!(out, " *")?;
        writeln!(out, "{}", comment_body(packet.doc().text_for(lang)))?;
        writeln!(out, " */")?;
        writeln!(out, "{};", signature(names, packet))?;
    }

    writeln!(out)?;
    writeln!(out, "/**")?;
    writeln!(out, " * \\ingroup {}", names.group)?;
    writeln!(out, " *")?;
    writeln!(out, " * Returns the name (including the hardware version), the firmware version")?;
    writeln!(
        out,
        " * and the binding version of the device. The firmware and binding versions are"
    )?;
    writeln!(out, " * given in arrays of size 3 with the syntax [major, minor, revision].")?;
    writeln!(out, " */")?;
    writeln!(out, "{};", version_signature(names))?;
    Ok(out)
}

fn signature(names: &DeviceNames, packet: &Packet) -> String {
    format!(
        "int {0}_{1}({2} *{0}{3})",
        names.var,
        packet.underscore_name(),
        names.ty,
        parameter_list(packet)
    )
}

fn version_signature(names: &DeviceNames) -> String {
    format!(
        "int {0}_get_version({1} *{0}, char ret_name[40], uint8_t ret_firmware_version[3], uint8_t ret_binding_version[3])",
        names.var, names.ty
    )
}

/// Definition of one call function.
pub fn definition(names: &DeviceNames, packet: &Packet, layout: &PacketLayout) -> Result<String> {
    let dev = &names.var;
    let locals = Locals::new(names, packet);
    let function = format!("FUNCTION_{}", packet.upper_case_name());
    let mut out = String::new();

    let Some(request) = layout.request() else {
        return Ok(out);
    };
    let response = layout.response();
    let request_struct = struct_name(&layout.name, FrameKind::Request);
    let frame = &locals.frame;

    writeln!(out)?;
    writeln!(out, "{} {{", signature(names, packet))?;
    writeln!(out, "\t{} {};", request_struct, frame)?;
    if let Some(response) = response {
        writeln!(
            out,
            "\t{} *{};",
            struct_name(&layout.name, response.kind),
            locals.response
        )?;
    }
    writeln!(out, "\tint {};", locals.status)?;
    if needs_index(request) || response.is_some_and(needs_index) {
        writeln!(out, "\tint {};", locals.index)?;
    }
    writeln!(out)?;

    writeln!(out, "\tif ({}->ipcon == NULL) {{", dev)?;
    writeln!(out, "\t\treturn E_NOT_ATTACHED;")?;
    writeln!(out, "\t}}")?;
    writeln!(out)?;
    writeln!(out, "\tipcon_mutex_lock(&{}->write_mutex);", dev)?;
    writeln!(out)?;

    writeln!(out, "\t{}.stack_id = {}->stack_id;", frame, dev)?;
    writeln!(out, "\t{}.function_id = {};", frame, function)?;
    writeln!(
        out,
        "\t{}.length = ipcon_leconvert_uint16_to(sizeof({}));",
        frame, request_struct
    )?;
    let member = format!("{}.", frame);
    for (slot, element) in request.slots.iter().zip(packet.elements(Direction::In)) {
        writeln!(out, "\t{}", marshal(&member, slot, element.name(), &locals.index))?;
    }
    writeln!(out)?;

    if let Some(response) = response {
        writeln!(out, "\t{}->response.function_id = {};", dev, function)?;
        writeln!(
            out,
            "\t{}->response.length = sizeof({});",
            dev,
            struct_name(&layout.name, response.kind)
        )?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "\t{} = ipcon_device_write({}, (const char *)&{}, sizeof({}));",
        locals.status, dev, frame, request_struct
    )?;
    writeln!(out, "\tif ({} != E_OK) {{", locals.status)?;
    writeln!(out, "\t\tipcon_mutex_unlock(&{}->write_mutex);", dev)?;
    writeln!(out, "\t\treturn {};", locals.status)?;
    writeln!(out, "\t}}")?;
    writeln!(out)?;

    if let Some(response) = response {
        let response_struct = struct_name(&layout.name, response.kind);
        writeln!(out, "\tif (ipcon_device_expect_response({}) != 0) {{", dev)?;
        writeln!(out, "\t\tipcon_mutex_unlock(&{}->write_mutex);", dev)?;
        writeln!(out, "\t\treturn E_TIMEOUT;")?;
        writeln!(out, "\t}}")?;
        writeln!(out)?;
        writeln!(
            out,
            "\t{} = ({} *){}->response.buffer;",
            locals.response, response_struct, dev
        )?;
        let member = format!("{}->", locals.response);
        for (slot, element) in response.slots.iter().zip(packet.elements(Direction::Out)) {
            let target = format!("ret_{}", element.name());
            writeln!(
                out,
                "\t{}",
                unmarshal(&member, slot, &target, true, &locals.index)
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "\tipcon_mutex_unlock(&{}->write_mutex);", dev)?;
    writeln!(out)?;
    writeln!(out, "\treturn E_OK;")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Definition of `get_version`, served from values cached on the handle.
pub fn version_definition(names: &DeviceNames) -> Result<String> {
    let dev = &names.var;
    let mut out = String::new();
    writeln!(out)?;
    writeln!(out, "{} {{", version_signature(names))?;
    writeln!(out, "\tstrncpy(ret_name, {}->name, 40);", dev)?;
    writeln!(out)?;
    for field in ["firmware_version", "binding_version"] {
        for i in 0..3 {
            writeln!(out, "\tret_{1}[{2}] = {0}->{1}[{2}];", dev, field, i)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "\treturn E_OK;")?;
    writeln!(out, "}}")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetgen_schema::load_device_from_str;

    const SCHEMA: &str = r#"
category: Bricklet
name: DistanceIR
display_name: Distance IR
version: [2, 0, 1]
packets:
  - type: function
    function_id: 1
    name: GetDistance
    elements:
      - [distance, uint16, 1, out]
    doc:
      text:
        en: Returns the distance in mm.
        de: Gibt die Entfernung in mm zurueck.
  - type: function
    function_id: 2
    name: SetPeriod
    elements:
      - [period, uint32, 1, in]
"#;

    fn fixture() -> (Device, packetgen_wire::DeviceLayout, DeviceNames) {
        let device = load_device_from_str(SCHEMA).expect("schema loads");
        let layout = packetgen_wire::DeviceLayout::resolve(&device).expect("layout resolves");
        let names = DeviceNames::new(&device);
        (device, layout, names)
    }

    #[test]
    fn test_function_id_defines() {
        let (device, _, _) = fixture();
        let defines = function_id_defines(&device).unwrap();
        assert_eq!(
            defines,
            "#define FUNCTION_GET_DISTANCE 1\n#define FUNCTION_SET_PERIOD 2\n"
        );
    }

    #[test]
    fn test_call_with_response() {
        let (device, layout, names) = fixture();
        let packet = device.packet(1).unwrap();
        let code = definition(&names, packet, layout.packet(1).unwrap()).unwrap();

        assert!(code.contains(
            "int distance_ir_get_distance(DistanceIR *distance_ir, uint16_t *ret_distance) {"
        ));
        assert!(code.contains("return E_NOT_ATTACHED;"));
        assert!(code.contains("distance_ir->response.length = sizeof(GetDistanceReturn_);"));
        assert!(code.contains("return E_TIMEOUT;"));
        assert!(code.contains("*ret_distance = ipcon_leconvert_uint16_from(gdr->distance);"));

        // Attach check comes before the lock; the lock is released on all three exits.
        let attach = code.find("ipcon == NULL").unwrap();
        let lock = code.find("ipcon_mutex_lock").unwrap();
        assert!(attach < lock);
        assert_eq!(code.matches("ipcon_mutex_unlock").count(), 3);
    }

    #[test]
    fn test_call_without_response() {
        let (device, layout, names) = fixture();
        let packet = device.packet(2).unwrap();
        let code = definition(&names, packet, layout.packet(2).unwrap()).unwrap();

        assert!(code.contains(
            "int distance_ir_set_period(DistanceIR *distance_ir, uint32_t period) {"
        ));
        assert!(code.contains("sp.period = ipcon_leconvert_uint32_to(period);"));
        assert!(!code.contains("expect_response"));
        assert!(!code.contains("E_TIMEOUT"));
        assert_eq!(code.matches("ipcon_mutex_unlock").count(), 2);
    }

    #[test]
    fn test_declarations_are_localized() {
        let (device, _, names) = fixture();
        let en = declarations(&device, &names, "en").unwrap();
        assert!(en.contains(" * Returns the distance in mm."));
        assert!(en.contains(" * \\ingroup BrickletDistanceIR"));
        assert!(en.contains(
            "int distance_ir_get_version(DistanceIR *distance_ir, char ret_name[40]"
        ));

        let de = declarations(&device, &names, "de").unwrap();
        assert!(de.contains(" * Gibt die Entfernung in mm zurueck."));
    }

    #[test]
    fn test_version_definition() {
        let (_, _, names) = fixture();
        let code = version_definition(&names).unwrap();
        assert!(code.contains("strncpy(ret_name, distance_ir->name, 40);"));
        assert!(code.contains("ret_binding_version[2] = distance_ir->binding_version[2];"));
        assert!(!code.contains("ipcon_device_write"));
    }
}
