//! The built-in schema for OpenRTB 2 first-party data.
//!
//! Request-level objects the auction fills in itself (`imp`, `cur`, `source`)
//! are rejected outright. `site`, `user` and `device` are checked field by
//! field, and the demographic fields of `user` are dropped when the visitor
//! opted out.

use std::sync::LazyLock;

use super::{FieldDescriptor, Schema, ShapeKind};

static ORTB2: LazyLock<Schema> = LazyLock::new(build);

/// The shared ORTB2 schema table, built on first use.
#[must_use]
pub fn schema() -> &'static Schema {
    &ORTB2
}

fn build() -> Schema {
    Schema::new()
        .with_field(
            "imp",
            FieldDescriptor::array_of(ShapeKind::Object).with_invalid(true),
        )
        .with_field(
            "cur",
            FieldDescriptor::array_of(ShapeKind::Object).with_invalid(true),
        )
        .with_field("source", FieldDescriptor::default().with_invalid(true))
        .with_field("site", FieldDescriptor::object().with_children(site()))
        .with_field("user", FieldDescriptor::object().with_children(user()))
        .with_field("device", FieldDescriptor::object().with_children(device()))
}

fn site() -> Schema {
    let strings = ["name", "domain", "page", "ref", "keywords", "search"]
        .into_iter()
        .map(|name| (name, FieldDescriptor::string()));
    let categories = ["cat", "sectioncat", "pagecat"]
        .into_iter()
        .map(|name| (name, FieldDescriptor::array_of(ShapeKind::String)));

    strings
        .chain(categories)
        .collect::<Schema>()
        .with_field(
            "content",
            FieldDescriptor::object().with_children(Schema::new().with_field("data", data())),
        )
        .with_field("publisher", FieldDescriptor::object())
}

fn user() -> Schema {
    Schema::new()
        .with_field("yob", FieldDescriptor::number().with_redact_on_opt_out(true))
        .with_field("gender", FieldDescriptor::string().with_redact_on_opt_out(true))
        .with_field("keywords", FieldDescriptor::string())
        .with_field("data", data())
}

fn device() -> Schema {
    Schema::new()
        .with_field("w", FieldDescriptor::number())
        .with_field("h", FieldDescriptor::number())
}

// Segment taxonomy shared by `user.data` and `site.content.data`.
fn data() -> FieldDescriptor {
    let segment = FieldDescriptor::array_of(ShapeKind::Object)
        .with_required(["id"])
        .with_children(
            Schema::new()
                .with_field("id", FieldDescriptor::string())
                .with_field("name", FieldDescriptor::string()),
        );

    FieldDescriptor::array_of(ShapeKind::Object)
        .with_required(["name", "segment"])
        .with_children(
            Schema::new()
                .with_field("segment", segment)
                .with_field("name", FieldDescriptor::string())
                .with_field("ext", FieldDescriptor::object()),
        )
}
