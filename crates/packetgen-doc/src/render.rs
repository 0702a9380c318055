//! Markdown rendering.

use std::fmt::Write;

use packetgen_schema::{Device, DocCategory, Packet};
use packetgen_wire::{DeviceLayout, PacketLayout, Status};

use crate::labels::Labels;
use crate::Result;

const CATEGORIES: [DocCategory; 3] = [
    DocCategory::Basic,
    DocCategory::Advanced,
    DocCategory::LowLevel,
];

/// Render the API reference of `device` in `lang`.
///
/// Packet text missing in `lang` falls back to English.
pub fn render_markdown(device: &Device, lang: &str) -> Result<String> {
    let layout = DeviceLayout::resolve(device)?;
    let labels = Labels::for_language(lang);
    let mut out = String::new();

    let [major, minor, revision] = device.version();
    writeln!(out, "# {}", device.expected_name())?;
    writeln!(out)?;
    if !device.description().trim().is_empty() {
        writeln!(out, "{}", device.description().trim())?;
        writeln!(out)?;
    }
    writeln!(out, "{}: {}.{}.{}", labels.binding_version, major, minor, revision)?;
    writeln!(out)?;

    writeln!(out, "## {}", labels.api)?;
    writeln!(out)?;
    writeln!(out, "{}", labels.api_intro)?;
    writeln!(out)?;
    writeln!(out, "### {}", labels.status_codes)?;
    writeln!(out)?;
    for status in Status::ALL {
        writeln!(out, "- `{}` = {}", status.c_name(), status.code())?;
    }

    for category in CATEGORIES {
        let packets: Vec<&Packet> = device
            .functions()
            .filter(|p| p.doc().category == category)
            .collect();
        if packets.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "## {}", labels.category(category))?;
        for packet in packets {
            if let Some(packet_layout) = layout.packet(packet.function_id()) {
                write_packet(&mut out, packet, packet_layout, labels, lang)?;
            }
        }
    }

    if device.callback_count() > 0 {
        writeln!(out)?;
        writeln!(out, "## {}", labels.callbacks)?;
        writeln!(out)?;
        writeln!(out, "{}", labels.callbacks_intro)?;
        for packet in device.callbacks() {
            if let Some(packet_layout) = layout.packet(packet.function_id()) {
                write_packet(&mut out, packet, packet_layout, labels, lang)?;
            }
        }
    }

    Ok(out)
}

fn write_packet(
    out: &mut String,
    packet: &Packet,
    layout: &PacketLayout,
    labels: &Labels,
    lang: &str,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "### {}", packet.name())?;
    writeln!(out)?;

    let mut sizes = Vec::new();
    if let Some(request) = layout.request() {
        sizes.push(format!("{} {} {}", labels.request, request.frame_size(), labels.bytes));
        match layout.response() {
            Some(response) => sizes.push(format!(
                "{} {} {}",
                labels.response,
                response.frame_size(),
                labels.bytes
            )),
            None => sizes.push(labels.no_response.to_string()),
        }
    }
    if let Some(frame) = layout.callback() {
        sizes.push(format!("{} {} {}", labels.frame, frame.frame_size(), labels.bytes));
    }
    writeln!(
        out,
        "{}: {} ({})",
        labels.function_id,
        packet.function_id(),
        sizes.join(", ")
    )?;
    writeln!(out)?;

    if packet.all_elements().is_empty() {
        writeln!(out, "{}", labels.no_elements)?;
    } else {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            labels.name, labels.ty, labels.count, labels.direction
        )?;
        writeln!(out, "|---|---|---:|---|")?;
        for element in packet.all_elements() {
            writeln!(
                out,
                "| `{}` | {} | {} | {} |",
                element.name(),
                element.ty(),
                element.count(),
                element.direction()
            )?;
        }
    }

    let text = packet.doc().text_for(lang).trim();
    if !text.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", text)?;
    }
    Ok(())
}
