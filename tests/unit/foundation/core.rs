use super::*;

#[test]
fn hex_parses_short_long_and_alpha_forms() {
    assert_eq!(Rgba8::from_hex("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex("#22D3EE").unwrap(),
        Rgba8::rgb(0x22, 0xd3, 0xee)
    );
    assert_eq!(
        Rgba8::from_hex("00000080").unwrap(),
        Rgba8::rgba(0, 0, 0, 0x80)
    );
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn hex_serde_uses_lowercase_strings() {
    let json = serde_json::to_string(&Rgba8::rgb(0xFD, 0xE0, 0x47)).unwrap();
    assert_eq!(json, "\"#fde047\"");
    let back: Rgba8 = serde_json::from_str("\"#FDE047\"").unwrap();
    assert_eq!(back, Rgba8::rgb(0xfd, 0xe0, 0x47));
}

#[test]
fn with_alpha_scales_existing_alpha() {
    assert_eq!(Rgba8::WHITE.with_alpha(0.6).a, 153);
    assert_eq!(Rgba8::rgba(0, 0, 0, 128).with_alpha(0.5).a, 64);
    assert_eq!(Rgba8::WHITE.with_alpha(f32::NAN).a, 0);
}

#[test]
fn canvas_rejects_zero_and_scales() {
    assert!(Canvas::new(0, 10).is_err());
    let c = Canvas::new(1080, 1350).unwrap();
    assert_eq!(c.scaled(0.5), Size::new(540.0, 675.0));
}

#[test]
fn premul_rounds_channels() {
    let p = Rgba8::rgba(255, 128, 0, 128).premultiplied();
    assert_eq!((p.r, p.g, p.b, p.a), (128, 64, 0, 128));
}
