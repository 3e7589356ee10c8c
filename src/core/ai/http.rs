use reqwest::Client;
use std::time::Duration;

/// 创建网关使用的 HTTP 客户端
///
/// GigaChat 使用自签名证书链，`verify_ssl` 为 false 时跳过证书校验。
pub fn build_client(timeout_secs: u64, verify_ssl: bool) -> reqwest::Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .danger_accept_invalid_certs(!verify_ssl)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(30, true).is_ok());
        assert!(build_client(30, false).is_ok());
    }
}
