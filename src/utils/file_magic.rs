/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// 提交归档只接受 zip，其余类型一律拒绝。
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".zip"）
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".zip" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        // 未知格式 - 默认拒绝
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_magic() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x0A, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".zip"));
        assert!(validate_magic_bytes(&zip_header, ".ZIP"));
    }

    #[test]
    fn test_non_zip_content() {
        assert!(!validate_magic_bytes(b"#!/bin/sh\necho hi", ".zip"));
        assert!(!validate_magic_bytes(b"%PDF-1.4", ".zip"));
    }

    #[test]
    fn test_unknown_extension() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04];
        assert!(!validate_magic_bytes(&zip_header, ".exe"));
        assert!(!validate_magic_bytes(&zip_header, ".tar"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".zip"));
    }
}
