use anyhow::Result;

use memeforge::Config;

use super::default_aggregator;

pub fn cmd_providers(query: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let aggregator = default_aggregator(&config)?;

    let secrets: Vec<String> = [config.tenor_api_key(), config.giphy_api_key()]
        .into_iter()
        .flatten()
        .collect();

    println!("🔌 Providers (merged in this order, timeout {:?}):\n", config.provider_timeout());
    for provider in aggregator.providers() {
        println!(
            "   {:<8} {}",
            provider.name(),
            redact(&provider.endpoint(query), &secrets)
        );
    }

    Ok(())
}

/// Query parameters that carry an API key.
const KEY_PARAMS: [&str; 2] = ["key", "api_key"];

/// Hide configured API keys; the public demo keys are shown as-is.
///
/// Only the value of a key parameter is touched, never the host, path or
/// other parameters.
fn redact(endpoint: &str, secrets: &[String]) -> String {
    let Some((base, query)) = endpoint.split_once('?') else {
        return endpoint.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if KEY_PARAMS.contains(&name) && is_secret(value, secrets) => {
                format!("{name}=***")
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{base}?{}", params.join("&"))
}

fn is_secret(encoded: &str, secrets: &[String]) -> bool {
    let value = urlencoding::decode(encoded).map_or_else(|_| encoded.to_string(), |v| v.into_owned());
    !value.is_empty() && secrets.iter().any(|s| *s == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_configured_keys() {
        let url = "https://api.giphy.com/v1/gifs/trending?api_key=s3cr%2Ft&limit=50";
        assert_eq!(
            redact(url, &["s3cr/t".to_string()]),
            "https://api.giphy.com/v1/gifs/trending?api_key=***&limit=50"
        );
    }

    #[test]
    fn short_keys_only_mask_the_key_parameter() {
        let url = "https://api.giphy.com/v1/gifs/search?api_key=api&q=api&limit=50";
        assert_eq!(
            redact(url, &["api".to_string(), "50".to_string(), "v1".to_string()]),
            "https://api.giphy.com/v1/gifs/search?api_key=***&q=api&limit=50"
        );

        let tenor = "https://tenor.googleapis.com/v2/featured?key=v2&limit=50";
        assert_eq!(
            redact(tenor, &["v2".to_string()]),
            "https://tenor.googleapis.com/v2/featured?key=***&limit=50"
        );
    }

    #[test]
    fn demo_keys_and_plain_urls_pass_through() {
        let url = "https://api.imgflip.com/get_memes";
        assert_eq!(redact(url, &["api".to_string()]), url);

        let demo = "https://tenor.googleapis.com/v2/featured?key=LIVDSRZULELA&limit=50";
        assert_eq!(redact(demo, &[]), demo);
    }
}
