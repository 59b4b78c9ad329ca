//! Path helpers shared by the scanner and startup code / 路径工具函数

use std::path::{Path, PathBuf};

/// Get file extension (lowercase) / 获取文件扩展名
pub fn get_ext(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Check whether the file carries one of the given extensions / 判断扩展名是否在列表中
///
/// `extensions` are compared without the leading dot, case-insensitively.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let ext = get_ext(path);
    if ext.is_empty() {
        return false;
    }
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// File identifier used in results: the bare file name / 文件标识（文件名）
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Expand a leading `~` to the home directory / 展开 ~ 为用户目录
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

    fn exts() -> Vec<String> {
        vec!["md".to_string(), ".txt".to_string()]
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("notes/a.md"), &exts()));
        assert!(has_extension(Path::new("notes/B.TXT"), &exts()));
        assert!(!has_extension(Path::new("notes/c.rs"), &exts()));
        assert!(!has_extension(Path::new("notes/README"), &exts()));
    }

    #[test]
    fn test_file_id() {
        assert_eq!(file_id(Path::new("/srv/content/sub/doc.md")), "doc.md");
        assert_eq!(file_id(Path::new("plain.txt")), "plain.txt");
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("content"), PathBuf::from("content"));
        assert_eq!(expand_home("../@content"), PathBuf::from("../@content"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/@content"), home.join("@content"));
        }
    }
}
