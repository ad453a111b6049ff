use super::*;

#[test]
fn parse_hex_accepts_rgb_and_rgba() {
    assert_eq!(Rgba8::parse_hex("#ff8000").unwrap(), Rgba8::new(255, 128, 0, 255));
    assert_eq!(Rgba8::parse_hex("10203040").unwrap(), Rgba8::new(16, 32, 48, 64));
    assert!(Rgba8::parse_hex("#fff").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}

#[test]
fn hex_string_serde_roundtrip() {
    let c: Rgba8 = serde_json::from_str("\"#336699\"").unwrap();
    assert_eq!(c, Rgba8::new(0x33, 0x66, 0x99, 255));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#336699ff\"");
    assert!(serde_json::from_str::<Rgba8>("\"blue\"").is_err());
}

#[test]
fn default_font_size_is_fifteen_percent_clamped() {
    assert_eq!(default_font_size(300), 45);
    assert_eq!(default_font_size(1001), 150);
    assert_eq!(default_font_size(20), MIN_FONT_SIZE);
    assert_eq!(default_font_size(10_000), MAX_FONT_SIZE);
}

#[test]
fn validate_font_size_bounds() {
    assert!(validate_font_size(10).is_ok());
    assert!(validate_font_size(500).is_ok());
    assert!(validate_font_size(9).is_err());
    assert!(validate_font_size(501).is_err());
}

#[test]
fn split_lines_handles_escape_newline_and_empty() {
    assert_eq!(split_lines("PARTIAL\\nWORLD"), vec!["PARTIAL", "WORLD"]);
    assert_eq!(split_lines("a\nb\r\nc"), vec!["a", "b", "c"]);
    assert_eq!(split_lines(""), vec![""]);
    assert_eq!(split_lines("x\n"), vec!["x", ""]);
}
