use super::*;

#[test]
fn test_rect_is_empty() {
    assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
    assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
    assert!(Rect::new(0.0, 0.0, -1.0, 10.0).is_empty());
    assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_empty());
}

#[test]
fn test_rect_from_quad() {
    let quad = [10.0, 20.0, 110.0, 20.0, 110.0, 70.0, 10.0, 70.0];
    let rect = Rect::from_quad(&quad).unwrap();
    assert_eq!(rect, Rect::new(10.0, 20.0, 100.0, 50.0));
    assert!(Rect::from_quad(&[1.0, 2.0]).is_none());
}

#[test]
fn test_from_parts_rejects_zero_size() {
    assert!(UIElement::from_parts("Button", "OK", Rect::new(5.0, 5.0, 0.0, 0.0), true).is_none());
    let el = UIElement::from_parts("Button", "OK", Rect::new(5.0, 5.0, 10.0, 10.0), true).unwrap();
    assert_eq!(el.width, 10);
    assert_eq!(el.center(), (10, 10));
}

#[test]
fn test_from_parts_keeps_sub_pixel_elements() {
    let el = UIElement::from_parts("Separator", "", Rect::new(3.0, 8.0, 0.4, 20.0), true).unwrap();
    assert_eq!((el.width, el.height), (1, 20));

    let el = UIElement::from_parts("Rule", "", Rect::new(0.0, 0.0, 300.0, 0.2), true).unwrap();
    assert_eq!((el.width, el.height), (300, 1));

    assert!(UIElement::from_parts("Rule", "", Rect::new(0.0, 0.0, 300.0, -0.2), true).is_none());
}

#[test]
fn test_optional_fields_skip_empty() {
    let el = UIElement::from_parts("Edit", "Search", Rect::new(0.0, 0.0, 4.0, 4.0), true)
        .unwrap()
        .with_description(Some(String::new()))
        .with_value(Some("query".to_string()));
    assert!(el.description.is_none());
    assert_eq!(el.value.as_deref(), Some("query"));

    let json = serde_json::to_value(&el).unwrap();
    assert!(json.get("description").is_none());
    assert_eq!(json["type"], "Edit");
    assert_eq!(json["isEnabled"], true);
}

#[test]
fn test_raw_element_normalize() {
    let raw: RawElement = serde_json::from_str(
        r#"{"type":"Button","name":"Save","x":1.4,"y":2.6,"width":30,"height":12,"automationId":"save"}"#,
    )
    .unwrap();
    let el = raw.normalize().unwrap();
    assert_eq!((el.x, el.y), (1, 3));
    assert!(el.is_enabled);
    assert_eq!(el.automation_id.as_deref(), Some("save"));
}

#[test]
fn test_raw_element_without_type_defaults_to_control() {
    let raw: RawElement = serde_json::from_str(r#"{"width":3,"height":3}"#).unwrap();
    assert_eq!(raw.normalize().unwrap().element_type, "Control");
}

#[test]
fn test_raw_element_zero_size_dropped() {
    let raw: RawElement = serde_json::from_str(r#"{"type":"Text","name":"x"}"#).unwrap();
    assert!(raw.normalize().is_none());
}
