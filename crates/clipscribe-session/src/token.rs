use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};

/// Extract the session token from request headers
///
/// The session cookie wins over an `Authorization: Bearer` header, so a
/// browser session keeps working behind proxies that inject their own
/// bearer credentials.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    cookie_value(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn reads_named_cookie() {
        let map = headers(&[(COOKIE, "theme=dark; appSession=abc123; lang=en")]);
        assert_eq!(session_token(&map, "appSession"), Some("abc123"));
    }

    #[test]
    fn reads_cookie_from_second_header() {
        let map = headers(&[(COOKIE, "theme=dark"), (COOKIE, "appSession=\"quoted\"")]);
        assert_eq!(session_token(&map, "appSession"), Some("quoted"));
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let map = headers(&[(COOKIE, "appSessionOld=stale")]);
        assert_eq!(session_token(&map, "appSession"), None);
    }

    #[test]
    fn falls_back_to_bearer() {
        let map = headers(&[(COOKIE, "theme=dark"), (AUTHORIZATION, "Bearer tok-1")]);
        assert_eq!(session_token(&map, "appSession"), Some("tok-1"));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let map = headers(&[(COOKIE, "appSession=from-cookie"), (AUTHORIZATION, "Bearer from-header")]);
        assert_eq!(session_token(&map, "appSession"), Some("from-cookie"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let map = headers(&[(COOKIE, "appSession="), (AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(session_token(&map, "appSession"), None);
    }
}
