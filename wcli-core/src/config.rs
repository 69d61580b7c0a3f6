use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Default credentials file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".env";

pub const LATITUDE_KEY: &str = "LATITUDE";
pub const LONGITUDE_KEY: &str = "LONGITUDE";
pub const API_KEY_KEY: &str = "API_KEY";

/// Keys in the order they are prompted for and written.
pub const CREDENTIAL_KEYS: [&str; 3] = [LATITUDE_KEY, LONGITUDE_KEY, API_KEY_KEY];

/// Location and API key used to query the provider.
///
/// Values are stored verbatim; nothing checks that the coordinates are numeric
/// or that the key is non-empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub latitude: String,
    pub longitude: String,
    pub api_key: String,
}

impl Credentials {
    /// Build credentials from raw user input, trimming surrounding whitespace.
    pub fn from_input(latitude: &str, longitude: &str, api_key: &str) -> Self {
        Self {
            latitude: latitude.trim().to_string(),
            longitude: longitude.trim().to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (LATITUDE_KEY, self.latitude.as_str()),
            (LONGITUDE_KEY, self.longitude.as_str()),
            (API_KEY_KEY, self.api_key.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The `KEY=value` file holding [`Credentials`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIALS_FILE)
    }
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or truncate the file and write the three entries in order.
    ///
    /// Previous contents are discarded.
    pub fn write(&self, credentials: &Credentials) -> Result<()> {
        let write_err = |source| Error::CredentialsWrite { path: self.path.clone(), source };

        let file = File::create(&self.path).map_err(write_err)?;
        let mut out = BufWriter::new(file);

        for (key, value) in credentials.entries() {
            writeln!(out, "{key}={}", quote_value(value)).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;

        info!(path = %self.path.display(), "credentials written");
        Ok(())
    }

    /// Load credentials from the file without touching the process environment.
    ///
    /// A key missing from the file reads as an empty value.
    pub fn read(&self) -> Result<Credentials> {
        let unavailable = |source| Error::CredentialsUnavailable { path: self.path.clone(), source };

        #[allow(deprecated)]
        let entries = dotenv::from_path_iter(&self.path).map_err(unavailable)?;

        let mut values = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(unavailable)?;
            values.insert(key, value);
        }

        let mut take = |key: &str| {
            values.remove(key).unwrap_or_else(|| {
                warn!(path = %self.path.display(), key, "credential missing from file");
                String::new()
            })
        };

        Ok(Credentials {
            latitude: take(LATITUDE_KEY),
            longitude: take(LONGITUDE_KEY),
            api_key: take(API_KEY_KEY),
        })
    }
}

/// Prompt for each credential on `output` and read one line per key from `input`.
///
/// End of input yields an empty value for the remaining keys.
pub fn prompt_credentials<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Credentials> {
    let mut answers = Vec::with_capacity(CREDENTIAL_KEYS.len());

    for key in CREDENTIAL_KEYS {
        write!(output, "Enter {key}: ").map_err(Error::Prompt)?;
        output.flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        input.read_line(&mut line).map_err(Error::Prompt)?;
        answers.push(line);
    }

    Ok(Credentials::from_input(&answers[0], &answers[1], &answers[2]))
}

// Plain values are written as-is; anything the dotenv parser would reinterpret
// (whitespace, quotes, `#`, `$`, backslashes) gets quoted.
fn quote_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | ':' | '/' | ',' | '@'));

    if plain {
        value.to_string()
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            if matches!(c, '\\' | '"' | '$') {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor};

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join(".env"))
    }

    #[test]
    fn write_produces_three_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.write(&Credentials::from_input("40.71", "-74.01", "abc123")).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "LATITUDE=40.71\nLONGITUDE=-74.01\nAPI_KEY=abc123\n");
    }

    #[test]
    fn read_returns_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let creds = Credentials::from_input("  51.5 ", "\t-0.12", " key-with.dots_1 \n");

        store.write(&creds).unwrap();
        let loaded = store.read().unwrap();

        assert_eq!(loaded.latitude, "51.5");
        assert_eq!(loaded.longitude, "-0.12");
        assert_eq!(loaded.api_key, "key-with.dots_1");
    }

    #[test]
    fn unvalidated_values_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let creds = Credentials {
            latitude: "north of here".into(),
            longitude: "it's #1 $HOME".into(),
            api_key: r#"q"u\ote"#.into(),
        };

        store.write(&creds).unwrap();

        assert_eq!(store.read().unwrap(), creds);
    }

    #[test]
    fn write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "OLD=value\nLATITUDE=1\n").unwrap();

        store.write(&Credentials::from_input("2", "3", "k")).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(!contents.contains("OLD"));
        assert_eq!(store.read().unwrap(), Credentials::from_input("2", "3", "k"));
    }

    #[test]
    fn read_missing_file_points_to_setup() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let err = store.read().unwrap_err();

        assert!(matches!(err, Error::CredentialsUnavailable { .. }));
        assert!(err.to_string().contains("wcli setup"));
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "LATITUDE=10\n").unwrap();

        let creds = store.read().unwrap();

        assert_eq!(creds.latitude, "10");
        assert!(creds.longitude.is_empty());
        assert!(creds.api_key.is_empty());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nope").join(".env"));

        let err = store.write(&Credentials::default()).unwrap_err();

        assert!(matches!(err, Error::CredentialsWrite { .. }));
    }

    #[test]
    fn prompt_reads_one_trimmed_line_per_key() {
        let input = Cursor::new("  12.5\n-3.25  \n secret \n");
        let mut output = Vec::new();

        let creds = prompt_credentials(input, &mut output).unwrap();

        assert_eq!(creds, Credentials::from_input("12.5", "-3.25", "secret"));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter LATITUDE: Enter LONGITUDE: Enter API_KEY: "
        );
    }

    #[test]
    fn prompt_accepts_early_end_of_input() {
        let creds = prompt_credentials(Cursor::new("1\n"), Vec::new()).unwrap();

        assert_eq!(creds.latitude, "1");
        assert!(creds.longitude.is_empty());
        assert!(creds.api_key.is_empty());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let creds = Credentials::from_input("1", "2", "super-secret");
        let shown = format!("{creds:?}");

        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
