use super::*;
use serde_json::json;

fn doc_json(items: serde_json::Value) -> serde_json::Value {
    json!({
        "type": "png",
        "quality": 90,
        "w": 200,
        "h": 100,
        "bgc": "#fff",
        "bgUrl": "",
        "items": items,
    })
}

#[test]
fn parses_all_element_kinds_with_defaults() {
    let doc: LayoutDocument = serde_json::from_value(doc_json(json!([
        { "t": "text", "v": "Hello", "x": 10, "y": 10, "w": 100, "h": 30, "fn": "", "s": 16 },
        { "t": "image", "v": "/a.png", "x": -5, "y": 0, "w": 20, "h": 20 },
        { "t": "avatar", "v": "/b.png", "x": 0, "y": 0, "w": 20, "h": 20 },
        { "t": "qrcode", "v": "https://example.com", "x": 0, "y": 0, "w": 50, "h": 50 },
    ])))
    .unwrap();

    assert_eq!(doc.format, OutputFormat::Png);
    assert_eq!(doc.items.len(), 4);

    let Element::Text(t) = &doc.items[0] else {
        panic!("expected text element");
    };
    assert_eq!(t.font, "");
    assert_eq!(t.s, 16.0);
    assert_eq!(t.c, "#010203");
    assert_eq!(
        t.bounds,
        ElementBox {
            x: 10,
            y: 10,
            w: 100,
            h: 30
        }
    );

    let Element::Image(i) = &doc.items[1] else {
        panic!("expected image element");
    };
    assert_eq!(i.bounds.x, -5);

    let Element::Avatar(a) = &doc.items[2] else {
        panic!("expected avatar element");
    };
    assert_eq!(a.c, "#ffffff");

    let Element::Qrcode(q) = &doc.items[3] else {
        panic!("expected qrcode element");
    };
    assert_eq!(q.p, 0);
    assert_eq!(q.c, "#010203");
    assert_eq!(q.wxacode_ref(), None);
}

#[test]
fn unknown_tags_are_accepted() {
    let doc: LayoutDocument = serde_json::from_value(doc_json(json!([
        { "t": "unknown", "x": 0, "y": 0, "w": 1, "h": 1 },
        { "t": "sticker", "v": "whatever" },
    ])))
    .unwrap();
    assert!(doc.items.iter().all(|e| *e == Element::Unknown));
    assert_eq!(doc.items[0].kind(), "unknown");
}

#[test]
fn missing_required_fields_are_document_errors() {
    let err = LayoutDocument::from_json_str(r#"{ "quality": 90, "w": 1, "h": 1, "items": [] }"#)
        .unwrap_err();
    assert!(matches!(err, PosterError::Document(_)));

    let err = LayoutDocument::from_json_str(
        r#"{ "type": "png", "quality": 90, "w": 1, "h": 1, "items": {} }"#,
    )
    .unwrap_err();
    assert!(matches!(err, PosterError::Document(_)));

    let err = LayoutDocument::from_json_str(
        r#"{ "type": "png", "quality": 90, "w": 1, "h": 1, "items": [ { "v": "x" } ] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, PosterError::Document(_)));
}

#[test]
fn format_aliases_normalize() {
    assert_eq!(OutputFormat::parse("jpg").unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::parse("JPEG").unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::parse("webp").unwrap(), OutputFormat::Webp);
    assert!(OutputFormat::parse("tiff").is_err());

    assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
    assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    assert!(!OutputFormat::Jpeg.has_alpha());
    assert!(OutputFormat::Png.has_alpha());
}

#[test]
fn jpg_alias_in_document() {
    let mut v = doc_json(json!([]));
    v["type"] = json!("jpg");
    let doc: LayoutDocument = serde_json::from_value(v).unwrap();
    assert_eq!(doc.format, OutputFormat::Jpeg);
}

#[test]
fn background_ref_ignores_blank_and_null() {
    let mut v = doc_json(json!([]));
    let doc: LayoutDocument = serde_json::from_value(v.clone()).unwrap();
    assert_eq!(doc.background_ref(), None);

    v["bgUrl"] = serde_json::Value::Null;
    let doc: LayoutDocument = serde_json::from_value(v.clone()).unwrap();
    assert_eq!(doc.background_ref(), None);

    v["bgUrl"] = json!("  /img/bg.png ");
    let doc: LayoutDocument = serde_json::from_value(v).unwrap();
    assert_eq!(doc.background_ref(), Some("/img/bg.png"));
}

#[test]
fn wxacode_prefix_is_detected() {
    let q = QrElement {
        bounds: ElementBox::default(),
        v: "wxacode:https://cdn.example.com/code.png".to_owned(),
        c: String::new(),
        p: 0,
    };
    assert_eq!(q.wxacode_ref(), Some("https://cdn.example.com/code.png"));
}
