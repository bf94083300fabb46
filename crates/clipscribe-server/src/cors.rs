use clipscribe_config::{AnyOrList, CorsConfig};
use http::Method;
use http::header::HeaderName;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Browsers refuse wildcards on credentialed requests, so with `credentials`
/// set a wildcard mirrors the request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();
    let mirror = config.credentials;

    layer = match &config.origins {
        AnyOrList::Any if mirror => layer.allow_origin(AllowOrigin::mirror_request()),
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(origins)
        }
    };

    layer = match &config.methods {
        AnyOrList::Any if mirror => layer.allow_methods(AllowMethods::mirror_request()),
        AnyOrList::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrList::List(methods) => {
            let methods: Vec<Method> = methods.iter().filter_map(|m| m.parse().ok()).collect();
            layer.allow_methods(methods)
        }
    };

    layer = match &config.headers {
        AnyOrList::Any if mirror => layer.allow_headers(AllowHeaders::mirror_request()),
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => {
            let headers: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
            layer.allow_headers(headers)
        }
    };

    // Needed for the session cookie on cross-origin uploads
    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_with_credentials_do_not_panic() {
        let config: CorsConfig = toml::from_str("credentials = true").unwrap();
        let _layer = cors_layer(&config);
    }

    #[test]
    fn explicit_lists() {
        let config: CorsConfig = toml::from_str(
            r#"
            origins = ["https://app.example.com"]
            methods = ["POST", "OPTIONS"]
            headers = ["content-type"]
            max_age = 600
            "#,
        )
        .unwrap();
        let _layer = cors_layer(&config);
    }
}
