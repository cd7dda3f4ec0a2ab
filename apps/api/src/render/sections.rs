//! Builders shared by every layout: header, section shells and one block per entry.
//!
//! A section is omitted entirely when its backing list is empty or its text is blank.
//! Entry blocks follow document order and each carries its move controls.

use crate::models::{
    EducationEntry, Entry, EntryList, ExperienceEntry, PhotoSource, ProjectEntry,
    ResumeDocument, SectionKind, SkillEntry,
};
use crate::render::bridge::{EntryField, FieldBinding, MoveControls, PersonalField};
use crate::render::layout::{Blueprint, HeaderStyle};
use crate::render::tokens::Tokens;
use crate::render::tree::{Node, Role, SectionId, Style};

pub fn header(doc: &ResumeDocument, blueprint: &Blueprint, tokens: &Tokens) -> Node {
    let info = &doc.personal_info;
    let mut children = Vec::new();

    if blueprint.show_photo {
        if let Some(photo) = photo(doc, tokens) {
            children.push(photo);
        }
    }

    let code = blueprint.header == HeaderStyle::Code;
    if code {
        children.push(Node::element(
            "div",
            Style::new().set("color", tokens.ink.accent),
            vec![Node::text("class Professional {")],
        ));
    }

    children.push(Node::field(
        "h1",
        FieldBinding::personal(PersonalField::FullName),
        &info.full_name,
        tokens.name.clone(),
    ));

    let job_title = Node::field(
        "p",
        FieldBinding::personal(PersonalField::JobTitle),
        &info.job_title,
        tokens.job_title.clone(),
    );
    if code {
        children.push(Node::element(
            "div",
            Style::new(),
            vec![Node::text("// "), job_title],
        ));
    } else {
        children.push(job_title);
    }

    let contact_fields = [
        (PersonalField::Email, &info.email),
        (PersonalField::Phone, &info.phone),
        (PersonalField::Location, &info.location),
        (PersonalField::Website, &info.website),
    ];
    let contact = contact_fields
        .into_iter()
        .map(|(field, value)| {
            let node = Node::field(
                "span",
                FieldBinding::personal(field),
                value,
                Style::new(),
            );
            if code {
                Node::element(
                    "div",
                    Style::new(),
                    vec![
                        Node::text(format!("const {} = \"", field.as_str())),
                        node,
                        Node::text("\";"),
                    ],
                )
            } else {
                node
            }
        })
        .collect();
    children.push(Node::with_role(
        "div",
        Role::Contact,
        tokens.contact.clone(),
        contact,
    ));

    Node::with_role("header", Role::Header, tokens.header.clone(), children)
}

/// Photo image, or the name's initials when a photo slot exists but nothing is set.
fn photo(doc: &ResumeDocument, tokens: &Tokens) -> Option<Node> {
    let info = &doc.personal_info;
    match info.photo_source() {
        Some(PhotoSource::Embedded(src)) | Some(PhotoSource::Url(src)) => Some(Node::Image {
            src: src.to_string(),
            alt: info.full_name.clone(),
            style: tokens.photo.clone(),
        }),
        None => {
            let initials: String = info
                .full_name
                .split_whitespace()
                .filter_map(|part| part.chars().next())
                .collect();
            (!initials.is_empty()).then(|| {
                Node::element("div", tokens.initials.clone(), vec![Node::text(initials)])
            })
        }
    }
}

/// Builds each section of `order` that has content, skipping the rest.
pub fn sections(
    doc: &ResumeDocument,
    order: &[SectionId],
    blueprint: &Blueprint,
    tokens: &Tokens,
) -> Vec<Node> {
    order
        .iter()
        .filter_map(|&id| section(doc, id, blueprint, tokens))
        .collect()
}

pub fn section(
    doc: &ResumeDocument,
    id: SectionId,
    blueprint: &Blueprint,
    tokens: &Tokens,
) -> Option<Node> {
    let body = match id {
        SectionId::Summary => {
            if doc.summary.trim().is_empty() {
                return None;
            }
            vec![Node::multiline_field(
                "p",
                FieldBinding::Summary,
                &doc.summary,
                tokens.entry_body.clone(),
            )]
        }
        SectionId::Experience => {
            entries(&doc.experience, SectionKind::Experience, tokens, experience)?
        }
        SectionId::Education => {
            entries(&doc.education, SectionKind::Education, tokens, education)?
        }
        SectionId::Projects => entries(&doc.projects, SectionKind::Projects, tokens, project)?,
        SectionId::Skills => {
            let chips = entries(&doc.skills, SectionKind::Skills, tokens, skill)?;
            vec![Node::element("div", tokens.chip_list.clone(), chips)]
        }
    };

    let heading = Node::with_role(
        "h2",
        Role::SectionHeading { section: id },
        tokens.heading.clone(),
        vec![Node::text(blueprint.titles.get(id))],
    );
    let mut children = Vec::with_capacity(body.len() + 1);
    children.push(heading);
    children.extend(body);

    Some(Node::with_role(
        "section",
        Role::Section { section: id },
        tokens.section.clone(),
        children,
    ))
}

/// One entry block per record, or `None` for an empty list.
fn entries<T: Entry>(
    list: &EntryList<T>,
    section: SectionKind,
    tokens: &Tokens,
    content: fn(&T, &Tokens) -> (&'static str, Vec<Node>),
) -> Option<Vec<Node>> {
    let len = list.len();
    if len == 0 {
        return None;
    }
    Some(
        list.iter()
            .enumerate()
            .map(|(index, entry)| {
                let (tag, children) = content(entry, tokens);
                let style = if section == SectionKind::Skills {
                    tokens.chip.clone()
                } else {
                    tokens.entry.clone()
                };
                Node::with_role(
                    tag,
                    Role::Entry {
                        section,
                        id: entry.id().clone(),
                        index,
                        controls: MoveControls::for_position(section, index, len),
                    },
                    style,
                    children,
                )
            })
            .collect(),
    )
}

fn experience(entry: &ExperienceEntry, tokens: &Tokens) -> (&'static str, Vec<Node>) {
    let bind = |field| FieldBinding::entry(SectionKind::Experience, &entry.id, field);
    let end = if entry.current {
        Node::text("Present")
    } else {
        Node::field("span", bind(EntryField::EndDate), &entry.end_date, Style::new())
    };
    (
        "div",
        vec![
            Node::field(
                "h3",
                bind(EntryField::Position),
                &entry.position,
                tokens.entry_title.clone(),
            ),
            Node::element(
                "div",
                tokens.entry_meta.clone(),
                vec![
                    Node::field("span", bind(EntryField::Company), &entry.company, Style::new()),
                    Node::text(" · "),
                    Node::field("span", bind(EntryField::Location), &entry.location, Style::new()),
                    Node::text(" · "),
                    Node::field("span", bind(EntryField::StartDate), &entry.start_date, Style::new()),
                    Node::text(" – "),
                    end,
                ],
            ),
            Node::multiline_field(
                "p",
                bind(EntryField::Description),
                &entry.description,
                tokens.entry_body.clone(),
            ),
        ],
    )
}

fn education(entry: &EducationEntry, tokens: &Tokens) -> (&'static str, Vec<Node>) {
    let bind = |field| FieldBinding::entry(SectionKind::Education, &entry.id, field);
    (
        "div",
        vec![
            Node::element(
                "h3",
                tokens.entry_title.clone(),
                vec![
                    Node::field("span", bind(EntryField::Degree), &entry.degree, Style::new()),
                    Node::text(" "),
                    Node::field("span", bind(EntryField::Field), &entry.field, Style::new()),
                ],
            ),
            Node::element(
                "div",
                tokens.entry_meta.clone(),
                vec![
                    Node::field("span", bind(EntryField::School), &entry.school, Style::new()),
                    Node::text(" · "),
                    Node::field("span", bind(EntryField::Location), &entry.location, Style::new()),
                    Node::text(" · "),
                    Node::field("span", bind(EntryField::StartDate), &entry.start_date, Style::new()),
                    Node::text(" – "),
                    Node::field("span", bind(EntryField::EndDate), &entry.end_date, Style::new()),
                ],
            ),
        ],
    )
}

fn skill(entry: &SkillEntry, _tokens: &Tokens) -> (&'static str, Vec<Node>) {
    (
        "span",
        vec![Node::field(
            "span",
            FieldBinding::entry(SectionKind::Skills, &entry.id, EntryField::Name),
            &entry.name,
            Style::new(),
        )],
    )
}

fn project(entry: &ProjectEntry, tokens: &Tokens) -> (&'static str, Vec<Node>) {
    let bind = |field| FieldBinding::entry(SectionKind::Projects, &entry.id, field);
    (
        "div",
        vec![
            Node::field("h3", bind(EntryField::Name), &entry.name, tokens.entry_title.clone()),
            Node::multiline_field(
                "p",
                bind(EntryField::Description),
                &entry.description,
                tokens.entry_body.clone(),
            ),
            Node::field("span", bind(EntryField::Link), &entry.link, tokens.link.clone()),
        ],
    )
}
