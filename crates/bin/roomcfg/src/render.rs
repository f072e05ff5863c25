//! Plain-text rendering of the editor read model.

use std::fmt;

use roomcfg_app::view::{ActionView, EditorView};
use roomcfg_domain::action::FieldValue;

struct FieldText<'a>(&'a FieldValue);

impl fmt::Display for FieldText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FieldValue::Null => Ok(()),
            FieldValue::Number(number) => write!(f, "{number}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

fn action_line(f: &mut fmt::Formatter<'_>, action: &ActionView) -> fmt::Result {
    write!(f, "  #{} {}", action.index + 1, action.kind)?;
    for field in &action.fields {
        write!(f, " {}={}", field.spec.key, FieldText(&field.value))?;
    }
    if !action.valid {
        f.write_str("  [invalid]")?;
    }
    writeln!(f)
}

/// Multi-line summary of a room, as printed by `show`.
pub struct Summary<'a>(pub &'a EditorView);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let details = &view.details;
        writeln!(f, "room {} (version {})", view.room_id, details.version)?;
        writeln!(
            f,
            "  {} / {} / {}  ip {}  type {}",
            details.campus, details.building, details.room, details.ip, details.room_type
        )?;
        if !details.sla.is_empty() || details.sla_expire_at.is_some() {
            writeln!(
                f,
                "  sla {} until {}",
                details.sla,
                details.sla_expire_at.as_deref().unwrap_or("-")
            )?;
        }
        if let Some(updated_at) = &details.updated_at {
            writeln!(f, "  updated {updated_at} by {}", details.updated_by)?;
        }
        for phase in &view.phases {
            writeln!(f, "{}:", phase.phase)?;
            for action in &phase.actions {
                action_line(f, action)?;
            }
        }
        if !view.report.is_ok() {
            f.write_str("problems:\n")?;
            for issue in &view.report.issues {
                writeln!(f, "  - {issue}")?;
            }
        }
        Ok(())
    }
}
