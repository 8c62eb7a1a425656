use rand::Rng;

/// 提交令牌默认长度
pub const TOKEN_LENGTH: usize = 64;

const TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成指定长度的字母数字令牌
pub fn random_token(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

/// 生成一次性提交令牌
pub fn submission_token() -> String {
    random_token(TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        for length in 1..20 {
            assert_eq!(random_token(length).len(), length);
        }
        assert_eq!(submission_token().len(), TOKEN_LENGTH);
    }

    #[test]
    fn test_token_charset() {
        let token = random_token(256);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_differ() {
        let a = submission_token();
        let b = submission_token();
        assert_ne!(a, b);
    }
}
