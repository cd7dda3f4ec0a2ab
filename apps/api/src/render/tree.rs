//! Visual tree produced by the layout strategies.
//!
//! The tree is plain data: no closures, no interior mutability, and only ordered
//! containers (`Vec`, `BTreeMap`), so two renders of the same input compare equal and
//! serialize to the same bytes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{EntryId, SectionKind};
use crate::render::bridge::{FieldBinding, MoveControls};

/// Every section a layout can emit, in canonical document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Summary,
        SectionId::Experience,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Summary => "Profile",
            SectionId::Experience => "Experience",
            SectionId::Education => "Education",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
        }
    }
}

/// Inline style declarations, kept sorted by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<&'static str, String>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(property, value.into());
        self
    }

    #[cfg(test)]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// What an element stands for; lets callers find sections and entries without
/// depending on a layout's markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Page,
    Header,
    Contact,
    Column { name: &'static str },
    Section { section: SectionId },
    SectionHeading { section: SectionId },
    Entry {
        section: SectionKind,
        id: EntryId,
        index: usize,
        controls: MoveControls,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    pub children: Vec<Node>,
}

/// A text-bearing field that can be edited in place. The binding says which store
/// operation receives the edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableField {
    pub tag: &'static str,
    pub binding: FieldBinding,
    pub value: String,
    pub multiline: bool,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
    Field(EditableField),
    Image { src: String, alt: String, style: Style },
}

impl Node {
    pub fn element(tag: &'static str, style: Style, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag,
            role: None,
            style,
            children,
        })
    }

    pub fn with_role(tag: &'static str, role: Role, style: Style, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag,
            role: Some(role),
            style,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn field(tag: &'static str, binding: FieldBinding, value: &str, style: Style) -> Self {
        Node::Field(EditableField {
            tag,
            binding,
            value: value.to_string(),
            multiline: false,
            style,
        })
    }

    pub fn multiline_field(
        tag: &'static str,
        binding: FieldBinding,
        value: &str,
        style: Style,
    ) -> Self {
        Node::Field(EditableField {
            tag,
            binding,
            value: value.to_string(),
            multiline: true,
            style,
        })
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            _ => &[],
        }
    }

    pub fn role(&self) -> Option<&Role> {
        match self {
            Node::Element(el) => el.role.as_ref(),
            _ => None,
        }
    }

    /// Depth-first, pre-order walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every node (self included) whose role satisfies `pred`, in document order.
    pub fn find_all<'a>(&'a self, pred: impl Fn(&Role) -> bool) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.role().is_some_and(&pred) {
                found.push(node);
            }
        });
        found
    }

    /// Serializes the tree as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                if let Some(role) = &el.role {
                    write_role_attrs(role, out);
                }
                write_style_attr(&el.style, out);
                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
            Node::Text { text } => out.push_str(&escape(text)),
            Node::Field(field) => {
                out.push('<');
                out.push_str(field.tag);
                out.push_str(" data-field=\"");
                out.push_str(&escape(&field.binding.key()));
                out.push('"');
                if field.multiline {
                    out.push_str(" data-multiline=\"true\"");
                }
                write_style_attr(&field.style, out);
                out.push('>');
                out.push_str(&escape(&field.value));
                out.push_str("</");
                out.push_str(field.tag);
                out.push('>');
            }
            Node::Image { src, alt, style } => {
                out.push_str("<img src=\"");
                out.push_str(&escape(src));
                out.push_str("\" alt=\"");
                out.push_str(&escape(alt));
                out.push('"');
                write_style_attr(style, out);
                out.push_str(">");
            }
        }
    }
}

fn write_role_attrs(role: &Role, out: &mut String) {
    match role {
        Role::Page => out.push_str(" data-role=\"page\""),
        Role::Header => out.push_str(" data-role=\"header\""),
        Role::Contact => out.push_str(" data-role=\"contact\""),
        Role::Column { name } => {
            out.push_str(" data-column=\"");
            out.push_str(name);
            out.push('"');
        }
        Role::Section { section } => {
            out.push_str(" data-section=\"");
            out.push_str(section.title());
            out.push('"');
        }
        Role::SectionHeading { .. } => out.push_str(" data-role=\"heading\""),
        Role::Entry { id, index, .. } => {
            out.push_str(" data-entry=\"");
            out.push_str(&escape(id.as_str()));
            out.push_str("\" data-index=\"");
            out.push_str(&index.to_string());
            out.push('"');
        }
    }
}

fn write_style_attr(style: &Style, out: &mut String) {
    if !style.is_empty() {
        out.push_str(" style=\"");
        out.push_str(&escape(&style.to_css()));
        out.push('"');
    }
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
