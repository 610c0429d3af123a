use super::*;

#[test]
fn percent_clamps_and_rejects_nan() {
    assert_eq!(clamp_percent(-5.0), 0.0);
    assert_eq!(clamp_percent(120.0), 100.0);
    assert_eq!(clamp_percent(42.5), 42.5);
    assert_eq!(clamp_percent(f64::NAN), 0.0);
}

#[test]
fn numeric_coercion_follows_field_rules() {
    assert_eq!(parse_int_or_zero("48"), 48);
    assert_eq!(parse_int_or_zero("abc"), 0);
    assert_eq!(parse_int_or_zero("12.7"), 12);
    assert_eq!(parse_float_or("1.4", 1.2), 1.4);
    assert_eq!(parse_float_or("", 1.2), 1.2);
    assert_eq!(parse_float_or("x", 1.6), 1.6);
}

#[test]
fn page_count_defaults_and_clamps() {
    assert_eq!(parse_page_count("abc"), 1);
    assert_eq!(parse_page_count(""), 1);
    assert_eq!(parse_page_count("0"), 1);
    assert_eq!(parse_page_count("5"), 5);
    assert_eq!(parse_page_count("25"), 10);
    assert_eq!(parse_page_count("-3"), 1);
}
