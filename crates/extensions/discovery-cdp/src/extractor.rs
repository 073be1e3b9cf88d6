//! Accessibility tree → [`UIElement`]s.
//!
//! Nodes are classified first (role table, ignore rules), then resolved to
//! page geometry through `DOM.getBoxModel`, then shifted into screen space.

use sightline_protocols::{Rect, UIElement};
use tracing::debug;

use crate::cdp::{AXNode, CdpError, PageSession};
use crate::offset::ScreenOffset;

/// Type assigned to roles missing from [`ROLE_TABLE`].
pub const GENERIC_TYPE: &str = "Control";

/// Semantic role → element type.
pub const ROLE_TABLE: &[(&str, &str)] = &[
    ("button", "Button"),
    ("togglebutton", "Button"),
    ("popupbutton", "Button"),
    ("link", "Hyperlink"),
    ("textbox", "Edit"),
    ("searchbox", "Edit"),
    ("textfield", "Edit"),
    ("combobox", "ComboBox"),
    ("listbox", "List"),
    ("checkbox", "CheckBox"),
    ("switch", "CheckBox"),
    ("radio", "RadioButton"),
    ("slider", "Slider"),
    ("spinbutton", "Spinner"),
    ("heading", "Text"),
    ("statictext", "Text"),
    ("paragraph", "Text"),
    ("label", "Text"),
    ("list", "List"),
    ("listitem", "ListItem"),
    ("option", "ListItem"),
    ("menu", "Menu"),
    ("menubar", "MenuBar"),
    ("menuitem", "MenuItem"),
    ("menuitemcheckbox", "MenuItem"),
    ("menuitemradio", "MenuItem"),
    ("tab", "TabItem"),
    ("tablist", "Tab"),
    ("table", "Table"),
    ("grid", "Table"),
    ("row", "DataItem"),
    ("cell", "DataItem"),
    ("gridcell", "DataItem"),
    ("tree", "Tree"),
    ("treeitem", "TreeItem"),
    ("dialog", "Window"),
    ("alertdialog", "Window"),
    ("toolbar", "ToolBar"),
    ("img", "Image"),
    ("image", "Image"),
];

/// Roles that only describe document structure.
const STRUCTURAL_ROLES: &[&str] = &["rootwebarea", "webarea", "inlinetextbox", "linebreak"];

pub fn element_type_for_role(role: &str) -> Option<&'static str> {
    ROLE_TABLE
        .iter()
        .find(|(r, _)| r.eq_ignore_ascii_case(role))
        .map(|(_, t)| *t)
}

/// A node that survived classification and still needs geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub element_type: &'static str,
    pub name: String,
    pub description: Option<String>,
    pub value: Option<String>,
    pub is_enabled: bool,
    pub backend_node_id: i64,
}

/// Decide whether a node can become an element.
pub fn classify(node: &AXNode) -> Option<Candidate> {
    if node.ignored {
        return None;
    }
    let role = node.role().filter(|r| !r.is_empty())?;
    if STRUCTURAL_ROLES.iter().any(|s| s.eq_ignore_ascii_case(role)) {
        return None;
    }
    let backend_node_id = node.backend_dom_node_id?;

    let name = node.name().map(str::trim).unwrap_or_default().to_string();
    let element_type = match element_type_for_role(role) {
        Some(t) => t,
        None if name.is_empty() => return None,
        None => GENERIC_TYPE,
    };

    Some(Candidate {
        element_type,
        name,
        description: node.description.as_ref().and_then(|v| v.to_text()),
        value: node.value.as_ref().and_then(|v| v.to_text()),
        is_enabled: !node.flag("disabled") && !node.flag("readonly"),
        backend_node_id,
    })
}

impl Candidate {
    /// Attach page geometry; zero-size boxes yield `None`.
    pub fn into_element(self, page_rect: Rect, offset: ScreenOffset) -> Option<UIElement> {
        let screen = offset.apply(page_rect);
        UIElement::from_parts(self.element_type, self.name, screen, self.is_enabled)
            .map(|e| e.with_description(self.description).with_value(self.value))
    }
}

/// Classify every node and resolve its geometry through the session.
///
/// Nodes without layout are skipped. Only transport failures abort.
pub async fn extract(
    session: &PageSession,
    nodes: &[AXNode],
    offset: ScreenOffset,
) -> Result<Vec<UIElement>, CdpError> {
    let mut elements = Vec::new();
    let mut skipped = 0usize;

    for candidate in nodes.iter().filter_map(classify) {
        let model = match session.get_box_model(candidate.backend_node_id).await {
            Ok(Some(model)) => model,
            Ok(None) => {
                skipped += 1;
                continue;
            }
            Err(e @ (CdpError::SessionClosed | CdpError::WebSocket(_))) => return Err(e),
            Err(e) => {
                debug!(node = candidate.backend_node_id, error = %e, "Box model unavailable");
                skipped += 1;
                continue;
            }
        };
        let quad = if model.border.is_empty() { &model.content } else { &model.border };
        let Some(rect) = Rect::from_quad(quad) else {
            skipped += 1;
            continue;
        };
        if let Some(element) = candidate.into_element(rect, offset) {
            elements.push(element);
        }
    }

    debug!(
        nodes = nodes.len(),
        elements = elements.len(),
        skipped,
        "Extracted accessibility elements"
    );
    Ok(elements)
}

/// The innermost interactive element under a screen point.
///
/// Hit-tests with `DOM.getNodeForLocation`, then classifies the partial
/// accessibility tree around the hit node.
pub async fn element_at(
    session: &PageSession,
    screen_x: f64,
    screen_y: f64,
    offset: ScreenOffset,
) -> Result<Option<UIElement>, CdpError> {
    let page_x = (screen_x - offset.x).round() as i64;
    let page_y = (screen_y - offset.y).round() as i64;
    if page_x < 0 || page_y < 0 {
        return Ok(None);
    }

    let hit = session.get_node_for_location(page_x, page_y).await?;
    let nodes = session.get_partial_tree(hit.backend_node_id).await?;
    let (sx, sy) = (screen_x as i32, screen_y as i32);

    let found = extract(session, &nodes, offset).await?;
    Ok(found
        .into_iter()
        .filter(|e| sx >= e.x && sx < e.x + e.width && sy >= e.y && sy < e.y + e.height)
        .min_by_key(|e| i64::from(e.width) * i64::from(e.height)))
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
