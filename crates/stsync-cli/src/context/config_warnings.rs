use stsync_config::StsyncConfig;
use stsync_core::Environment;

/// Warn about env vars that look like settings but were not picked up.
pub fn warn_unconfigured(config: &StsyncConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &StsyncConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    [Environment::Prod, Environment::Int]
        .into_iter()
        .filter(|env| !config.environment(*env).is_configured())
        .filter_map(|env| {
            let section = env.section().to_ascii_uppercase();
            let single = format!("STSYNC_{section}_");
            let double = format!("STSYNC_{section}__");
            let mistyped = env_keys
                .iter()
                .any(|key| key.starts_with(&single) && !key.starts_with(&double));
            mistyped.then(|| {
                format!(
                    "{} settings are incomplete while {single}* env vars exist. Use double underscores (example: {double}CLIENT_ID).",
                    env.label()
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use stsync_config::{EnvironmentConfig, StsyncConfig};

    use super::collect_unconfigured_warnings;

    fn configured() -> EnvironmentConfig {
        EnvironmentConfig {
            auth_url: "https://auth.example.com/connect/token".into(),
            api_base: "https://api.example.com".into(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            tenant_id: "42".into(),
            app_key: "ak".into(),
            scope: None,
        }
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &StsyncConfig::default(),
            vec![
                ("STSYNC_PROD_CLIENT_ID".to_string(), "cid".to_string()),
                ("STSYNC_INT_TENANT_ID".to_string(), "7".to_string()),
            ],
        );
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("STSYNC_PROD__CLIENT_ID"));
    }

    #[test]
    fn silent_when_configured_or_correctly_spelled() {
        let config = StsyncConfig {
            prod: configured(),
            ..StsyncConfig::default()
        };
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("STSYNC_PROD_CLIENT_ID".to_string(), "cid".to_string()),
                ("STSYNC_INT__TENANT_ID".to_string(), "7".to_string()),
            ],
        );
        assert!(warnings.is_empty());
    }
}
