//! Assembly of the `.h` and `.c` files.

use std::fmt::Write;

use packetgen_schema::Device;
use packetgen_wire::{DeviceLayout, Status};

use crate::types::{comment_body, DeviceNames};
use crate::{call, callback, frame, Result};

/// Banner placed at the top of both files.
fn banner(date: &str) -> String {
    format!(
        "/* ***********************************************************\n \
         * This file was automatically generated on {}.\n \
         *\n \
         * packetgen {}\n \
         *\n \
         * Changes will be lost when the file is regenerated.\n \
         * ***********************************************************/\n",
        date,
        env!("CARGO_PKG_VERSION")
    )
}

/// Status code defines, guarded so several device headers can be included
/// together.
pub fn status_defines() -> Result<String> {
    let mut out = String::new();
    for status in Status::ALL {
        writeln!(out, "#ifndef {}", status.c_name())?;
        writeln!(out, "#define {} {}", status.c_name(), status.code())?;
        writeln!(out, "#endif")?;
    }
    Ok(out)
}

pub(crate) fn header_file(
    device: &Device,
    names: &DeviceNames,
    file_stem: &str,
    date: &str,
    lang: &str,
) -> Result<String> {
    let guard = format!("{}_H", file_stem.to_uppercase());
    let mut out = banner(date);

    writeln!(out)?;
    writeln!(out, "#ifndef {}", guard)?;
    writeln!(out, "#define {}", guard)?;
    writeln!(out)?;
    writeln!(out, "#include <stdbool.h>")?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out)?;
    writeln!(out, "#include \"ip_connection.h\"")?;
    writeln!(out)?;
    out.push_str(&status_defines()?);
    writeln!(out)?;

    writeln!(out, "/**")?;
    writeln!(
        out,
        " * \\defgroup {} {} {}",
        names.group,
        names.ty,
        device.category()
    )?;
    writeln!(out, " */")?;
    writeln!(out)?;
    writeln!(out, "/**")?;
    writeln!(out, " * \\ingroup {}", names.group)?;
    writeln!(out, " *")?;
    writeln!(out, "{}", comment_body(device.description()))?;
    writeln!(out, " */")?;
    writeln!(out, "typedef Device {};", names.ty)?;

    out.push_str(&callback::callback_defines(device, names, lang)?);
    if device.callback_count() > 0 {
        writeln!(out)?;
        out.push_str(&callback::handler_typedefs(device, names)?);
    }
    out.push_str(&callback::declarations(device, names)?);
    out.push_str(&call::declarations(device, names, lang)?);

    writeln!(out)?;
    writeln!(out, "#endif")?;
    Ok(out)
}

pub(crate) fn source_file(
    device: &Device,
    layout: &DeviceLayout,
    names: &DeviceNames,
    file_stem: &str,
    date: &str,
) -> Result<String> {
    let mut out = banner(date);

    writeln!(out)?;
    writeln!(out, "#include \"{}.h\"", file_stem)?;
    writeln!(out)?;
    writeln!(out, "#include <string.h>")?;
    writeln!(out)?;
    out.push_str(&call::function_id_defines(device)?);
    writeln!(out)?;
    out.push_str(&frame::packed_structs(layout)?);

    for packet in device.functions() {
        if let Some(packet_layout) = layout.packet(packet.function_id()) {
            out.push_str(&call::definition(names, packet, packet_layout)?);
        }
    }
    out.push_str(&call::version_definition(names)?);

    for packet in device.callbacks() {
        if let Some(packet_layout) = layout.packet(packet.function_id()) {
            out.push_str(&callback::wrapper(names, packet, packet_layout)?);
        }
    }
    out.push_str(&callback::register_definitions(device, names)?);
    out.push_str(&callback::create_definition(device, names)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defines() {
        let defines = status_defines().unwrap();
        assert!(defines.contains("#define E_OK 0\n"));
        assert!(defines.contains("#define E_TIMEOUT -1\n"));
        assert!(defines.contains("#define E_NOT_ATTACHED -6\n"));
        assert_eq!(defines.matches("#ifndef").count(), Status::ALL.len());
    }

    #[test]
    fn test_banner_carries_date() {
        let text = banner("2024-01-31");
        assert!(text.starts_with("/* "));
        assert!(text.contains("generated on 2024-01-31."));
        assert!(text.trim_end().ends_with("*/"));
    }
}
