/// Currency molecules that clutter a pathway when drawn as a single node.
pub const CURRENCY_MOLECULES: &[&str] = &[
    "ATP",
    "ADP",
    "NADH",
    "NAD+",
    "NADPH",
    "NADP+",
    "AMP",
    "L-glutamate",
    "2-oxoglutarate",
    "CoA",
    "acetyl-CoA",
    "CO2",
    "P",
    "PP",
];

/// Ordered list of species names to split into discrete clones before a
/// branch search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    names: Vec<String>,
}

impl Blacklist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut blacklist = Blacklist::default();
        blacklist.extend(names);
        blacklist
    }

    pub fn currency_molecules() -> Self {
        Self::new(CURRENCY_MOLECULES.iter().copied())
    }

    /// One name per line; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(|line| line.split('#').next().unwrap_or("").trim())
                .filter(|line| !line.is_empty()),
        )
    }

    /// Append names, keeping first-seen order and dropping repeats.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.names.contains(&name) {
                self.names.push(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_molecules() {
        let blacklist = Blacklist::currency_molecules();
        assert!(blacklist.contains("ATP"));
        assert!(blacklist.contains("acetyl-CoA"));
        assert!(!blacklist.contains("glucose"));
        assert_eq!(blacklist.names().len(), CURRENCY_MOLECULES.len());
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let blacklist = Blacklist::parse("# cofactors\nATP\n\n  H2O  # water\nATP\n");
        assert_eq!(blacklist.names(), &["ATP".to_string(), "H2O".to_string()]);
    }
}
