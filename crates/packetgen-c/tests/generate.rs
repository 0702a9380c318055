//! Whole-file generation for the bundled device schemas.

use std::path::PathBuf;

use packetgen_c::{generate, generate_localized, EmitError};
use packetgen_schema::{load_device, load_device_from_str, Device};

fn bundled(name: &str) -> Device {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../devices")
        .join(name);
    load_device(&path).expect("bundled device loads")
}

#[test]
fn test_distance_ir_header() {
    let bindings = generate(&bundled("distance_ir.yaml")).expect("generation succeeds");
    assert_eq!(bindings.file_stem, "bricklet_distance_ir");
    assert_eq!(bindings.header_name(), "bricklet_distance_ir.h");

    let h = &bindings.header;
    assert!(h.contains("#ifndef BRICKLET_DISTANCE_IR_H"));
    assert!(h.contains("#include \"ip_connection.h\""));
    assert!(h.contains("#define E_NOT_ATTACHED -6"));
    assert!(h.contains("typedef Device DistanceIR;"));
    assert!(h.contains("#define DISTANCE_IR_CALLBACK_DISTANCE 15"));
    assert!(h.contains("#define DISTANCE_IR_CALLBACK_DISTANCE_REACHED 18"));
    assert!(h.contains(
        "int distance_ir_get_distance(DistanceIR *distance_ir, uint16_t *ret_distance);"
    ));
    assert!(h.contains(
        "int distance_ir_set_distance_callback_threshold(DistanceIR *distance_ir, char option, int16_t min, int16_t max);"
    ));
    assert!(h.contains("typedef void (*distance_ir_distance_func_t)(uint16_t distance);"));
    assert!(h.contains(
        "void distance_ir_register_distance_reached_callback(DistanceIR *distance_ir, distance_ir_distance_reached_func_t callback);"
    ));
    assert!(h.trim_end().ends_with("#endif"));
}

#[test]
fn test_distance_ir_source() {
    let bindings = generate(&bundled("distance_ir.yaml")).expect("generation succeeds");
    let c = &bindings.source;

    assert!(c.contains("#include \"bricklet_distance_ir.h\""));
    assert!(c.contains("#define FUNCTION_GET_DISTANCE 1\n"));
    assert!(c.contains("#define FUNCTION_GET_DISTANCE_CALLBACK_THRESHOLD 8\n"));
    // Callback ids live in the header only.
    assert!(!c.contains("#define DISTANCE_IR_CALLBACK_DISTANCE"));

    // Packed structs and their size checks.
    assert!(c.contains("} ATTRIBUTE_PACKED SetSamplingPoint_;"));
    assert!(c.contains(
        "typedef char SetSamplingPoint_size_check[sizeof(SetSamplingPoint_) == 7 ? 1 : -1];"
    ));
    assert!(c.contains(
        "typedef char GetDistanceCallbackThresholdReturn_size_check[sizeof(GetDistanceCallbackThresholdReturn_) == 9 ? 1 : -1];"
    ));
    assert!(c.contains(
        "typedef char DistanceCallback_size_check[sizeof(DistanceCallback_) == 6 ? 1 : -1];"
    ));
    assert!(!c.contains("SetSamplingPointReturn_"));

    assert!(c.contains("\tsdct.option = option;"));
    assert!(c.contains("\tsdct.min = ipcon_leconvert_int16_to(min);"));
    assert!(c.contains("\t*ret_max = ipcon_leconvert_int16_from(gdctr->max);"));
    assert!(c.contains(
        "distance_ir->callback_wrappers[DISTANCE_IR_CALLBACK_DISTANCE] = distance_ir_callback_wrapper_distance;"
    ));
    assert!(c.contains("distance_ir->expected_name = \"Distance IR Bricklet\";"));

    // Every call function body, get_version and each wrapper are present.
    let device = bundled("distance_ir.yaml");
    for packet in device.functions() {
        let name = format!("int distance_ir_{}(DistanceIR *distance_ir", packet.underscore_name());
        assert_eq!(c.matches(&name).count(), 1, "{}", name);
    }
    assert!(c.contains("int distance_ir_get_version("));
    assert_eq!(c.matches("static int distance_ir_callback_wrapper_").count(), 2);
}

#[test]
fn test_lcd_strings_bools_and_arrays() {
    let bindings = generate(&bundled("lcd_16x2.yaml")).expect("generation succeeds");
    assert_eq!(bindings.file_stem, "bricklet_lcd16x2");

    let h = &bindings.header;
    assert!(h.contains(
        "int lcd16x2_write_line(LCD16x2 *lcd16x2, uint8_t line, uint8_t position, const char text[16]);"
    ));
    assert!(h.contains("int lcd16x2_clear_display(LCD16x2 *lcd16x2);"));
    assert!(h.contains(
        "int lcd16x2_get_config(LCD16x2 *lcd16x2, bool *ret_cursor, bool *ret_blinking);"
    ));
    assert!(h.contains(
        "int lcd16x2_get_identity(LCD16x2 *lcd16x2, char ret_uid[8], uint8_t ret_hardware_version[3], uint8_t ret_firmware_version[3], uint16_t *ret_device_identifier);"
    ));

    let c = &bindings.source;
    assert!(c.contains("\tstrncpy(wl.text, text, 16);"));
    assert!(c.contains("\tsc.cursor = cursor ? 1 : 0;"));
    assert!(c.contains("\t*ret_blinking = gcr->blinking != 0;"));
    assert!(c.contains("\tmemcpy(scc.character, character, 8 * sizeof(uint8_t));"));
    assert!(c.contains("\tmemcpy(ret_character, gccr->character, 8 * sizeof(uint8_t));"));
    assert!(c.contains("\tstrncpy(ret_uid, gir->uid, 8);"));
    assert!(c.contains("\tuint8_t cursor;"));
    assert!(c.contains("typedef char WriteLine_size_check[sizeof(WriteLine_) == 22 ? 1 : -1];"));
    assert!(c.contains(
        "typedef char GetIdentityReturn_size_check[sizeof(GetIdentityReturn_) == 20 ? 1 : -1];"
    ));
    assert!(c.contains(
        "typedef char ClearDisplay_size_check[sizeof(ClearDisplay_) == 4 ? 1 : -1];"
    ));
}

#[test]
fn test_localized_comments_fall_back_to_english() {
    let device = bundled("lcd_16x2.yaml");
    let bindings = generate_localized(&device, "de").expect("generation succeeds");
    assert!(bindings.header.contains(" * Schreibt Text in eine bestimmte Zeile"));
    assert!(bindings.header.contains(" * Deletes all characters from the display."));
}

#[test]
fn test_oversized_frame_produces_nothing() {
    let device = load_device_from_str(
        r#"
category: Bricklet
name: Huge
version: [1, 0, 0]
packets:
  - type: function
    function_id: 1
    name: Dump
    elements:
      - [data, uint64, 9000, out]
"#,
    )
    .expect("schema itself is valid");

    let err = generate(&device).unwrap_err();
    assert!(matches!(err, EmitError::Layout(_)));
}

#[test]
fn test_write_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bindings");
    let bindings = generate(&bundled("distance_ir.yaml")).unwrap();

    let written = bindings.write_to(&out).unwrap();
    assert_eq!(
        written,
        vec![out.join("bricklet_distance_ir.h"), out.join("bricklet_distance_ir.c")]
    );
    assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), bindings.header);
    assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), bindings.source);
}

#[test]
fn test_failed_source_write_leaves_no_header() {
    let dir = tempfile::tempdir().unwrap();
    let bindings = generate(&bundled("distance_ir.yaml")).unwrap();

    // A non-empty directory where the source file belongs cannot be replaced.
    let blocker = dir.path().join("bricklet_distance_ir.c");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), "").unwrap();

    let err = bindings.write_to(dir.path()).unwrap_err();
    assert!(matches!(err, EmitError::Write { ref path, .. } if *path == blocker));

    let mut left: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["bricklet_distance_ir.c".to_string()]);
}
