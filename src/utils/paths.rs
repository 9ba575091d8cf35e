use std::path::PathBuf;

/// Expand a leading `~` to the user's home directory.
/// Paths without the prefix, or when no home directory is known, are returned as given.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.aws/config"), home.join(".aws/config"));
            assert_eq!(expand_home("~"), home);
        }
    }

    #[test]
    fn test_expand_home_leaves_other_paths() {
        assert_eq!(expand_home("/etc/ssl/cert.pem"), PathBuf::from("/etc/ssl/cert.pem"));
        assert_eq!(expand_home("certs/~cert.pem"), PathBuf::from("certs/~cert.pem"));
    }
}
