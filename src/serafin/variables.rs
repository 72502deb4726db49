//! Variable catalogue: file variable names mapped to short identifiers.
//!
//! Serafin files label variables with fixed 16-byte names ("VELOCITY U",
//! "WATER DEPTH", ...) while post-processing tools address them by short
//! identifiers ("U", "H", ...). The catalogue is an explicit configuration
//! object constructed by the caller and passed into [`super::decode`];
//! nothing here is global state, and lookups return `Option` rather than
//! failing.
//!
//! [`VariableCatalogue::default`] wires the built-in English 2D and 3D
//! Telemac tables. Callers with localized or custom result files build
//! their own catalogue with [`VariableCatalogue::with_entry`].

/// One catalogue entry: identifier, on-disk name and unit.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableEntry {
    /// Short identifier ("U", "H", ...)
    pub id: String,
    /// 16-byte on-disk variable name, trailing blanks trimmed
    pub name: String,
    /// 16-byte on-disk unit, trailing blanks trimmed
    pub unit: String,
}

/// Ordered catalogue of known variables.
#[derive(Clone, Debug)]
pub struct VariableCatalogue {
    entries: Vec<VariableEntry>,
}

impl Default for VariableCatalogue {
    /// The built-in English tables, 2D entries first.
    fn default() -> Self {
        Self::builtin()
    }
}

impl VariableCatalogue {
    /// Create an empty catalogue, for callers building their own tables
    /// with [`with_entry`]. For the stock Telemac tables use [`builtin`]
    /// (also available as [`Default`]).
    ///
    /// [`with_entry`]: Self::with_entry
    /// [`builtin`]: Self::builtin
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one entry (builder style). Earlier entries win on name clashes.
    pub fn with_entry(mut self, id: &str, name: &str, unit: &str) -> Self {
        self.entries.push(VariableEntry {
            id: id.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
        });
        self
    }

    /// Built-in English table for 2D (Telemac-2D) results.
    pub fn builtin_2d() -> Self {
        Self::new()
            .with_entry("U", "VELOCITY U", "M/S")
            .with_entry("V", "VELOCITY V", "M/S")
            .with_entry("C", "CELERITY", "M/S")
            .with_entry("H", "WATER DEPTH", "M")
            .with_entry("S", "FREE SURFACE", "M")
            .with_entry("B", "BOTTOM", "M")
            .with_entry("F", "FROUDE NUMBER", "")
            .with_entry("Q", "SCALAR FLOWRATE", "M2/S")
            .with_entry("I", "FLOWRATE ALONG X", "M2/S")
            .with_entry("J", "FLOWRATE ALONG Y", "M2/S")
            .with_entry("M", "SCALAR VELOCITY", "M/S")
            .with_entry("X", "WIND ALONG X", "M/S")
            .with_entry("Y", "WIND ALONG Y", "M/S")
            .with_entry("P", "AIR PRESSURE", "PASCAL")
            .with_entry("W", "BOTTOM FRICTION", "")
            .with_entry("T", "TRACER", "")
            .with_entry("L", "COURANT NUMBER", "")
    }

    /// Built-in English table for 3D (Telemac-3D) results.
    pub fn builtin_3d() -> Self {
        Self::new()
            .with_entry("Z", "ELEVATION Z", "M")
            .with_entry("U", "VELOCITY U", "M/S")
            .with_entry("V", "VELOCITY V", "M/S")
            .with_entry("W", "VELOCITY W", "M/S")
            .with_entry("NUX", "NUX FOR VELOCITY", "M2/S")
            .with_entry("NUY", "NUY FOR VELOCITY", "M2/S")
            .with_entry("NUZ", "NUZ FOR VELOCITY", "M2/S")
            .with_entry("K", "TURBULENT ENERGY", "JOULE/KG")
            .with_entry("EPS", "DISSIPATION", "WATT/KG")
            .with_entry("RI", "RICHARDSON NUMB", "")
            .with_entry("RHO", "RELATIVE DENSITY", "")
            .with_entry("DP", "DYNAMIC PRESSURE", "PA")
            .with_entry("PH", "HYDROSTATIC PRES", "PA")
    }

    /// Both built-in tables chained, 2D entries first.
    pub fn builtin() -> Self {
        let mut catalogue = Self::builtin_2d();
        catalogue
            .entries
            .extend(Self::builtin_3d().entries.into_iter());
        catalogue
    }

    /// Find the entry whose on-disk name matches (trailing blanks ignored).
    pub fn resolve(&self, name: &str) -> Option<&VariableEntry> {
        let name = name.trim_end();
        self.entries.iter().find(|e| e.name == name)
    }

    /// Find the entry with the given short identifier.
    pub fn by_id(&self, id: &str) -> Option<&VariableEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_trims_padding() {
        let catalogue = VariableCatalogue::builtin_2d();
        let entry = catalogue.resolve("WATER DEPTH     ").unwrap();
        assert_eq!(entry.id, "H");
        assert_eq!(entry.unit, "M");
    }

    #[test]
    fn test_unknown_name_is_none() {
        let catalogue = VariableCatalogue::builtin_2d();
        assert!(catalogue.resolve("SEDIMENT FLUX").is_none());
    }

    #[test]
    fn test_name_clash_first_wins() {
        // "VELOCITY U" exists in both tables; the merged catalogue must
        // resolve it to the 2D entry.
        let catalogue = VariableCatalogue::builtin();
        assert_eq!(catalogue.resolve("VELOCITY U").unwrap().id, "U");
        assert!(catalogue.by_id("EPS").is_some());
    }

    #[test]
    fn test_new_is_empty_default_is_builtin() {
        assert!(VariableCatalogue::new().resolve("WATER DEPTH").is_none());
        let stock = VariableCatalogue::default();
        assert_eq!(stock.resolve("WATER DEPTH").unwrap().id, "H");
    }

    #[test]
    fn test_custom_catalogue() {
        let catalogue = VariableCatalogue::new().with_entry("HD", "HAUTEUR D'EAU", "M");
        assert_eq!(catalogue.resolve("HAUTEUR D'EAU").unwrap().id, "HD");
        assert!(catalogue.resolve("WATER DEPTH").is_none());
    }
}
