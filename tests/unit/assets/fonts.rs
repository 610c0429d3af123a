use super::*;

#[test]
fn empty_book_resolves_nothing() {
    let mut book = FontBook::empty();
    assert_eq!(book.face_count(), 0);
    assert!(book.resolve(FontFamily::NotoSansTc, FontWeight::BOLD).is_none());
    // cached miss stays a miss
    assert!(book.resolve(FontFamily::NotoSansTc, FontWeight::BOLD).is_none());
}

#[test]
fn missing_dir_loads_no_faces() {
    let book = FontBook::load(false, &[Path::new("/definitely/not/a/font/dir")]);
    assert_eq!(book.face_count(), 0);
}

#[test]
fn non_font_data_is_ignored() {
    let mut book = FontBook::empty();
    book.load_font_data(b"not a font".to_vec());
    assert_eq!(book.face_count(), 0);
    assert!(book.resolve(FontFamily::Anton, FontWeight::REGULAR).is_none());
}

#[test]
fn serif_families_use_the_serif_fallback() {
    assert!(is_serif(FontFamily::NotoSerifTc));
    assert!(is_serif(FontFamily::PlayfairDisplay));
    assert!(!is_serif(FontFamily::DelaGothicOne));
}
