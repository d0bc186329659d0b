use crate::domain::listing::{Complex, Property, format_price};
use crate::domain::view_mode::ViewMode;

#[derive(Debug, Clone, Copy)]
pub enum Focused<'a> {
    Property(&'a Property),
    Complex(&'a Complex),
}

/// Read-only snapshot handed to display code once per update cycle.
#[derive(Debug, Clone)]
pub struct PortalView<'a> {
    pub mode: ViewMode,
    /// Filtered properties, whether or not properties are the active mode.
    pub properties: Vec<&'a Property>,
    /// Filtered complexes, whether or not complexes are the active mode.
    pub complexes: Vec<&'a Complex>,
    pub focused: Option<Focused<'a>>,
    /// Shortlisted ids, including ones that resolve to nothing.
    pub shortlist: Vec<String>,
    /// Shortlisted ids resolved against the full property collection.
    pub shortlisted: Vec<&'a Property>,
    pub map_ready: bool,
    pub marker_count: usize,
}

impl PortalView<'_> {
    /// Entries of the active mode.
    pub fn active_count(&self) -> usize {
        match self.mode {
            ViewMode::Properties => self.properties.len(),
            ViewMode::Complexes => self.complexes.len(),
        }
    }

    fn is_shortlisted(&self, id: &str) -> bool {
        self.shortlist.iter().any(|s| s == id)
    }
}

impl std::fmt::Display for PortalView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "# Agent Portal ({}) | Complexes ({}) | Properties ({})",
            self.mode,
            self.complexes.len(),
            self.properties.len()
        )?;
        writeln!(f, "Found: {} {}", self.active_count(), self.mode)?;
        match self.focused {
            Some(Focused::Property(p)) => writeln!(f, "Focused: [{}] {}", p.id, p.title)?,
            Some(Focused::Complex(c)) => writeln!(f, "Focused: [{}] {}", c.id, c.name)?,
            None => {}
        }
        if self.map_ready {
            writeln!(f, "Map: {} markers", self.marker_count)?;
        } else {
            writeln!(f, "Map: loading...")?;
        }

        match self.mode {
            ViewMode::Properties => {
                writeln!(f, "\n## Properties")?;
                if self.properties.is_empty() {
                    writeln!(f, "No properties match the current filters.")?;
                }
                for property in &self.properties {
                    writeln!(f, "\n{property}")?;
                    if self.is_shortlisted(&property.id) {
                        writeln!(f, "✓ In shortlist")?;
                    }
                }
            }
            ViewMode::Complexes => {
                writeln!(f, "\n## Complexes")?;
                if self.complexes.is_empty() {
                    writeln!(f, "No complexes match the current filters.")?;
                }
                for complex in &self.complexes {
                    writeln!(f, "\n{complex}")?;
                }
            }
        }

        if !self.shortlist.is_empty() {
            writeln!(f, "\n## Shortlist ({})", self.shortlist.len())?;
            for property in &self.shortlisted {
                writeln!(
                    f,
                    "- [{}] {} {}",
                    property.id,
                    property.title,
                    format_price(property.price)
                )?;
            }
        }
        Ok(())
    }
}
