//! C spellings of schema types, names and parameter lists.

use std::collections::HashSet;

use packetgen_schema::{naming, Device, Direction, Element, Packet, ScalarType};

/// C type of a value as the caller sees it.
pub fn c_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Int8 => "int8_t",
        ScalarType::Uint8 => "uint8_t",
        ScalarType::Int16 => "int16_t",
        ScalarType::Uint16 => "uint16_t",
        ScalarType::Int32 => "int32_t",
        ScalarType::Uint32 => "uint32_t",
        ScalarType::Int64 => "int64_t",
        ScalarType::Uint64 => "uint64_t",
        ScalarType::Float => "float",
        ScalarType::Bool => "bool",
        ScalarType::Char | ScalarType::String => "char",
    }
}

/// C type of a value inside a packed frame struct.
///
/// Identical to [`c_type`] except for `bool`, which is a single wire byte
/// regardless of the compiler's `sizeof(bool)`.
pub fn storage_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Bool => "uint8_t",
        other => c_type(other),
    }
}

/// `type name` or `type name[count]`; strings are always arrays.
pub fn declarator(type_name: &str, name: &str, ty: ScalarType, count: usize) -> String {
    if count > 1 || ty == ScalarType::String {
        format!("{} {}[{}]", type_name, name, count)
    } else {
        format!("{} {}", type_name, name)
    }
}

fn is_aggregate(element: &Element) -> bool {
    element.count() > 1 || element.ty() == ScalarType::String
}

/// Parameter declaration for a function packet element.
///
/// Outputs get a `ret_` prefix and are passed by pointer (scalars) or as
/// caller-owned arrays.
pub fn function_parameter(element: &Element) -> String {
    let ty = c_type(element.ty());
    match element.direction() {
        Direction::In if is_aggregate(element) => format!(
            "const {}",
            declarator(ty, element.name(), element.ty(), element.count())
        ),
        Direction::In => declarator(ty, element.name(), element.ty(), 1),
        Direction::Out if is_aggregate(element) => declarator(
            ty,
            &format!("ret_{}", element.name()),
            element.ty(),
            element.count(),
        ),
        Direction::Out => format!("{} *ret_{}", ty, element.name()),
    }
}

/// `, p1, p2, ...` for a function packet, following the device argument.
pub fn parameter_list(packet: &Packet) -> String {
    packet
        .all_elements()
        .iter()
        .map(|e| format!(", {}", function_parameter(e)))
        .collect()
}

/// Handler parameter list of a callback packet, `void` if it has none.
pub fn callback_parameter_list(packet: &Packet) -> String {
    let params: Vec<String> = packet
        .all_elements()
        .iter()
        .map(|e| declarator(c_type(e.ty()), e.name(), e.ty(), e.count()))
        .collect();
    if params.is_empty() {
        "void".to_string()
    } else {
        params.join(", ")
    }
}

/// Identifiers derived from the device name.
#[derive(Debug, Clone)]
pub struct DeviceNames {
    /// Handle variable and function prefix, `distance_ir`.
    pub var: String,
    /// Handle type, `DistanceIR`.
    pub ty: String,
    /// Macro prefix, `DISTANCE_IR`.
    pub upper: String,
    /// Doxygen group, `BrickletDistanceIR`.
    pub group: String,
}

impl DeviceNames {
    pub fn new(device: &Device) -> Self {
        // A plain CamelCase name is kept as configured so acronyms survive.
        let ty = if device.name().chars().all(|c| c.is_ascii_alphanumeric()) {
            device.name().to_string()
        } else {
            naming::camel_case(device.name())
        };
        DeviceNames {
            var: device.underscore_name(),
            upper: device.upper_case_name(),
            group: format!("{}{}", device.category(), ty),
            ty,
        }
    }
}

/// Output file name without extension, `bricklet_distance_ir`.
pub fn file_stem(device: &Device) -> String {
    format!(
        "{}_{}",
        naming::snake_case(device.category()),
        device.underscore_name()
    )
}

/// C type name of a packet, `GetDistance`.
pub fn packet_type_name(name: &str) -> String {
    naming::camel_case(name)
}

/// Local identifiers used inside one generated function body, chosen so
/// they never shadow a parameter.
#[derive(Debug, Clone)]
pub struct Locals {
    /// Request struct, or callback struct in a wrapper.
    pub frame: String,
    /// Pointer to the response struct.
    pub response: String,
    /// Transport status.
    pub status: String,
    /// Loop index.
    pub index: String,
    /// Handler pointer in a callback wrapper.
    pub handler: String,
}

impl Locals {
    pub fn new(device: &DeviceNames, packet: &Packet) -> Self {
        let mut taken: HashSet<String> = HashSet::new();
        taken.insert(device.var.clone());
        for element in packet.all_elements() {
            taken.insert(element.name().to_string());
            taken.insert(format!("ret_{}", element.name()));
        }

        let short = naming::short_form(packet.name());
        let short = if short.is_empty() { "p".to_string() } else { short };
        let suffix = if packet.kind() == packetgen_schema::PacketKind::Callback {
            "c"
        } else {
            ""
        };

        let frame = unique(&mut taken, format!("{}{}", short, suffix));
        let response = unique(&mut taken, format!("{}r", short));
        let status = unique(&mut taken, "rc".to_string());
        let index = unique(&mut taken, "i".to_string());
        let handler = unique(&mut taken, "callback".to_string());
        Locals {
            frame,
            response,
            status,
            index,
            handler,
        }
    }
}

fn unique(taken: &mut HashSet<String>, mut name: String) -> String {
    while taken.contains(&name) {
        name.push('_');
    }
    taken.insert(name.clone());
    name
}

/// Escape `text` for use inside a C string literal.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Lines of a `/** ... */` block body, each prefixed with ` * `.
pub fn comment_body(text: &str) -> String {
    let text = text.trim().replace("*/", "* /");
    if text.is_empty() {
        return " *".to_string();
    }
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                " *".to_string()
            } else {
                format!(" * {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, ty: ScalarType, count: usize, direction: Direction) -> Element {
        Element::new(name, ty, count, direction)
    }

    #[test]
    fn test_c_types() {
        assert_eq!(c_type(ScalarType::Int16), "int16_t");
        assert_eq!(c_type(ScalarType::Uint64), "uint64_t");
        assert_eq!(c_type(ScalarType::String), "char");
        assert_eq!(c_type(ScalarType::Bool), "bool");
        assert_eq!(storage_type(ScalarType::Bool), "uint8_t");
        assert_eq!(storage_type(ScalarType::Float), "float");
    }

    #[test]
    fn test_function_parameters() {
        assert_eq!(
            function_parameter(&element("value", ScalarType::Int16, 1, Direction::In)),
            "int16_t value"
        );
        assert_eq!(
            function_parameter(&element("data", ScalarType::Uint8, 8, Direction::In)),
            "const uint8_t data[8]"
        );
        assert_eq!(
            function_parameter(&element("distance", ScalarType::Uint16, 1, Direction::Out)),
            "uint16_t *ret_distance"
        );
        assert_eq!(
            function_parameter(&element("name", ScalarType::String, 20, Direction::Out)),
            "char ret_name[20]"
        );
        assert_eq!(
            function_parameter(&element("tag", ScalarType::String, 1, Direction::In)),
            "const char tag[1]"
        );
    }

    #[test]
    fn test_callback_parameter_list() {
        let packet = Packet::callback(
            5,
            "Axes",
            vec![
                element("axes", ScalarType::Uint16, 3, Direction::Out),
                element("moving", ScalarType::Bool, 1, Direction::Out),
            ],
        );
        assert_eq!(callback_parameter_list(&packet), "uint16_t axes[3], bool moving");
        assert_eq!(callback_parameter_list(&Packet::callback(6, "Tap", vec![])), "void");
    }

    #[test]
    fn test_locals_avoid_parameter_names() {
        let device = DeviceNames {
            var: "counter".to_string(),
            ty: "Counter".to_string(),
            upper: "COUNTER".to_string(),
            group: "BrickletCounter".to_string(),
        };
        let packet = Packet::function(
            1,
            "GetDistance",
            vec![
                element("gd", ScalarType::Uint8, 1, Direction::In),
                element("i", ScalarType::Uint8, 2, Direction::In),
            ],
        );
        let locals = Locals::new(&device, &packet);
        assert_eq!(locals.frame, "gd_");
        assert_eq!(locals.response, "gdr");
        assert_eq!(locals.index, "i_");
        assert_eq!(locals.status, "rc");
    }

    #[test]
    fn test_string_literal_and_comments() {
        assert_eq!(string_literal("Distance IR Bricklet"), "\"Distance IR Bricklet\"");
        assert_eq!(string_literal("a\"b\\"), "\"a\\\"b\\\\\"");
        assert_eq!(comment_body("one\n\ntwo */"), " * one\n *\n * two * /");
        assert_eq!(comment_body("  "), " *");
    }
}
