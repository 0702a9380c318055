//! `packetgen layout`: print resolved frame layouts.

use std::fmt::Write;

use packetgen_wire::{DeviceLayout, HEADER_SIZE};

use crate::error::Result;

/// Human-readable table of every frame, one slot per line.
pub fn render_text(layout: &DeviceLayout) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", layout.device)?;
    for packet in &layout.packets {
        writeln!(out)?;
        writeln!(out, "{} (function id {})", packet.name, packet.function_id)?;
        for frame in packet.frames() {
            writeln!(out, "  {} frame, {} bytes", frame.kind, frame.frame_size())?;
            writeln!(out, "    {:>5}  {:<20} header", 0, "")?;
            for slot in &frame.slots {
                writeln!(
                    out,
                    "    {:>5}  {:<20} {}[{}] {:?}",
                    HEADER_SIZE + slot.offset,
                    slot.name,
                    slot.layout.wire_type,
                    slot.layout.count,
                    slot.layout.transfer()
                )?;
            }
        }
    }
    Ok(out)
}

/// The layout as pretty-printed JSON.
pub fn render_json(layout: &DeviceLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}
