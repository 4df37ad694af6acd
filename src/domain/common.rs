use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for logs and reports.
pub trait Displayable {
    fn display_label(&self) -> String;
}
