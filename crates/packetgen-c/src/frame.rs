//! Packed frame structs and per-element transfer statements.
//!
//! Struct fields follow the resolved [`FrameLayout`] slot by slot, so the C
//! struct and the reference codec agree on every offset. Each struct is
//! followed by a size check that fails to compile if the compiler did not
//! pack it.

use std::fmt::Write;

use packetgen_schema::ScalarType;
use packetgen_wire::{DeviceLayout, FrameKind, FrameLayout, Slot, Transfer};

use crate::types::{c_type, declarator, packet_type_name, storage_type};
use crate::Result;

const PACK_BEGIN: &str = "\
#if defined _MSC_VER || defined __BORLANDC__
\t#pragma pack(push)
\t#pragma pack(1)
\t#define ATTRIBUTE_PACKED
#elif defined __GNUC__
\t#define ATTRIBUTE_PACKED __attribute__((packed))
#else
\t#error unknown compiler, do not know how to enable struct packing
#endif
";

const PACK_END: &str = "\
#if defined _MSC_VER || defined __BORLANDC__
\t#pragma pack(pop)
#endif
#undef ATTRIBUTE_PACKED
";

/// Name of the struct for one frame of packet `packet_name`.
pub fn struct_name(packet_name: &str, kind: FrameKind) -> String {
    let base = packet_type_name(packet_name);
    match kind {
        FrameKind::Request => format!("{}_", base),
        FrameKind::Response => format!("{}Return_", base),
        FrameKind::Callback => format!("{}Callback_", base),
    }
}

/// All packed frame structs of a device, followed by their size checks.
pub fn packed_structs(layout: &DeviceLayout) -> Result<String> {
    let mut out = String::new();
    out.push_str(PACK_BEGIN);

    let mut checks = String::new();
    for packet in &layout.packets {
        for frame in packet.frames() {
            let name = struct_name(&packet.name, frame.kind);
            write_struct(&mut out, &name, frame)?;
            writeln!(
                checks,
                "typedef char {0}size_check[sizeof({0}) == {1} ? 1 : -1];",
                name,
                frame.frame_size()
            )?;
        }
    }

    out.push('\n');
    out.push_str(PACK_END);
    if !checks.is_empty() {
        out.push('\n');
        out.push_str(&checks);
    }
    Ok(out)
}

fn write_struct(out: &mut String, name: &str, frame: &FrameLayout) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "typedef struct {{")?;
    writeln!(out, "\tuint8_t stack_id;")?;
    writeln!(out, "\tuint8_t function_id;")?;
    writeln!(out, "\tuint16_t length;")?;
    for slot in &frame.slots {
        let ty = slot.layout.wire_type;
        writeln!(
            out,
            "\t{};",
            declarator(storage_type(ty), &slot.name, ty, slot.layout.count)
        )?;
    }
    writeln!(out, "}} ATTRIBUTE_PACKED {};", name)?;
    Ok(())
}

/// Statement copying caller value `source` into `frame.<slot>`.
///
/// `frame` is the struct expression including the member operator
/// (`gd.` or `gdr->`); `index` names the loop variable.
pub fn marshal(frame: &str, slot: &Slot, source: &str, index: &str) -> String {
    let layout = &slot.layout;
    let ty = layout.wire_type;
    let count = layout.count;
    let field = format!("{}{}", frame, slot.name);
    match layout.transfer() {
        Transfer::StringCopy => format!("strncpy({}, {}, {});", field, source, count),
        Transfer::ArraySwap => format!(
            "for ({i} = 0; {i} < {n}; {i}++) {f}[{i}] = ipcon_leconvert_{t}_to({s}[{i}]);",
            i = index,
            n = count,
            f = field,
            t = ty.as_str(),
            s = source
        ),
        Transfer::ArrayCopy if ty == ScalarType::Bool => format!(
            "for ({i} = 0; {i} < {n}; {i}++) {f}[{i}] = {s}[{i}] ? 1 : 0;",
            i = index,
            n = count,
            f = field,
            s = source
        ),
        Transfer::ArrayCopy => format!(
            "memcpy({}, {}, {} * sizeof({}));",
            field,
            source,
            count,
            c_type(ty)
        ),
        Transfer::ScalarSwap => {
            format!("{} = ipcon_leconvert_{}_to({});", field, ty.as_str(), source)
        }
        Transfer::ScalarCopy if ty == ScalarType::Bool => {
            format!("{} = {} ? 1 : 0;", field, source)
        }
        Transfer::ScalarCopy => format!("{} = {};", field, source),
    }
}

/// Statement copying `frame.<slot>` out to caller storage `target`.
///
/// With `by_pointer`, scalar targets are written through `*target`.
pub fn unmarshal(frame: &str, slot: &Slot, target: &str, by_pointer: bool, index: &str) -> String {
    let layout = &slot.layout;
    let ty = layout.wire_type;
    let count = layout.count;
    let field = format!("{}{}", frame, slot.name);
    let scalar_target = if by_pointer {
        format!("*{}", target)
    } else {
        target.to_string()
    };
    match layout.transfer() {
        Transfer::StringCopy => format!("strncpy({}, {}, {});", target, field, count),
        Transfer::ArraySwap => format!(
            "for ({i} = 0; {i} < {n}; {i}++) {d}[{i}] = ipcon_leconvert_{t}_from({f}[{i}]);",
            i = index,
            n = count,
            d = target,
            t = ty.as_str(),
            f = field
        ),
        Transfer::ArrayCopy if ty == ScalarType::Bool => format!(
            "for ({i} = 0; {i} < {n}; {i}++) {d}[{i}] = {f}[{i}] != 0;",
            i = index,
            n = count,
            d = target,
            f = field
        ),
        Transfer::ArrayCopy => format!(
            "memcpy({}, {}, {} * sizeof({}));",
            target,
            field,
            count,
            c_type(ty)
        ),
        Transfer::ScalarSwap => format!(
            "{} = ipcon_leconvert_{}_from({});",
            scalar_target,
            ty.as_str(),
            field
        ),
        Transfer::ScalarCopy if ty == ScalarType::Bool => {
            format!("{} = {} != 0;", scalar_target, field)
        }
        Transfer::ScalarCopy => format!("{} = {};", scalar_target, field),
    }
}

/// Whether any slot needs a loop index.
pub fn needs_index(frame: &FrameLayout) -> bool {
    frame.slots.iter().any(|slot| {
        matches!(slot.layout.transfer(), Transfer::ArraySwap)
            || (slot.layout.transfer() == Transfer::ArrayCopy
                && slot.layout.wire_type == ScalarType::Bool)
    })
}
