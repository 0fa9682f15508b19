use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the directory that holds the city CSVs.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

const BUILTIN_CITIES: [(&str, &str); 3] = [
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// Maps city names to the CSV file holding their trips.
///
/// Can be replaced by a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "data/chicago.csv",
///   "washington": "/srv/bikeshare/washington.csv"
/// }
/// ```
/// Keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCatalog {
    entries: BTreeMap<String, PathBuf>,
}

impl CityCatalog {
    /// The three published cities under `data_dir`.
    pub fn builtin(data_dir: &Path) -> Self {
        let entries = BUILTIN_CITIES
            .iter()
            .map(|(city, file)| (city.to_string(), data_dir.join(file)))
            .collect();
        Self { entries }
    }

    /// Built-in catalog rooted at `$BIKESHARE_DATA_DIR`, or `data/`.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::builtin(Path::new(&data_dir))
    }

    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading city catalog {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, PathBuf> =
            serde_json::from_str(content).context("parsing city catalog")?;
        let entries = raw
            .into_iter()
            .map(|(city, path)| (city.to_lowercase(), path))
            .collect();
        Ok(Self { entries })
    }

    /// Returns the data file for `city`, if one is configured.
    pub fn path_for(&self, city: &str) -> Option<&Path> {
        self.entries.get(&city.to_lowercase()).map(PathBuf::as_path)
    }

    /// City names in title case, as offered to the user.
    pub fn city_names(&self) -> Vec<String> {
        self.entries.keys().map(|city| title_case(city)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `new york city` -> `New York City`.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_builtin_catalog() {
        let catalog = CityCatalog::builtin(Path::new("/srv/data"));

        assert_eq!(
            catalog.path_for("chicago"),
            Some(Path::new("/srv/data/chicago.csv"))
        );
        assert_eq!(
            catalog.path_for("New York City"),
            Some(Path::new("/srv/data/new_york_city.csv"))
        );
        assert_eq!(catalog.path_for("boston"), None);
    }

    #[test]
    fn test_city_names_are_title_case() {
        let catalog = CityCatalog::builtin(Path::new("data"));
        assert_eq!(
            catalog.city_names(),
            vec!["Chicago", "New York City", "Washington"]
        );
    }

    #[test]
    fn test_from_json_lowercases_keys() {
        let catalog = CityCatalog::from_json(r#"{ "Boston": "/tmp/boston.csv" }"#).unwrap();
        assert_eq!(catalog.path_for("boston"), Some(Path::new("/tmp/boston.csv")));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(CityCatalog::from_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join("bikeshare_stats_test_catalog.json");
        fs::write(&path, r#"{ "washington": "dc.csv" }"#).unwrap();

        let catalog = CityCatalog::load(&path).unwrap();
        assert_eq!(catalog.path_for("Washington"), Some(Path::new("dc.csv")));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york city"), "New York City");
        assert_eq!(title_case("chicago"), "Chicago");
        assert_eq!(title_case(""), "");
    }
}
