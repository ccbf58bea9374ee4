//! HTTP Digest authentication (RFC 2617 / RFC 7616, MD5 family).
//!
//! The TV protects every endpoint except pairing with Digest auth, using the
//! device ID as username and the pairing auth key as password. The scheme:
//!   HA1 = MD5(username:realm:password)      (MD5-sess: MD5(HA1:nonce:cnonce))
//!   HA2 = MD5(method:uri)
//!   response = MD5(HA1:nonce:nc:cnonce:qop:HA2)   with qop=auth
//!   response = MD5(HA1:nonce:HA2)                 without qop

use md5::{Digest, Md5};

/// Hash variant announced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Md5Sess,
}

/// A parsed `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub algorithm: DigestAlgorithm,
    /// Whether the server offered `qop=auth`.
    pub qop_auth: bool,
}

impl DigestChallenge {
    /// Parses the value of a `WWW-Authenticate` header.
    ///
    /// Returns `None` for non-Digest schemes, unsupported algorithms, or
    /// challenges missing `realm` or `nonce`.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, params) = header.split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }

        let mut realm = None;
        let mut nonce = None;
        let mut opaque = None;
        let mut algorithm = DigestAlgorithm::Md5;
        let mut qop_auth = false;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "opaque" => opaque = Some(value),
                "algorithm" => {
                    algorithm = match value.to_ascii_uppercase().as_str() {
                        "MD5" => DigestAlgorithm::Md5,
                        "MD5-SESS" => DigestAlgorithm::Md5Sess,
                        _ => return None,
                    }
                }
                "qop" => {
                    qop_auth = value
                        .split(',')
                        .any(|q| q.trim().eq_ignore_ascii_case("auth"));
                }
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            nonce: nonce?,
            opaque,
            algorithm,
            qop_auth,
        })
    }

    /// Computes the `Authorization` header value for one request.
    ///
    /// `nc` is the nonce count for this nonce (starting at 1) and `cnonce` a
    /// client nonce; both are only sent when the server offered `qop=auth`.
    pub fn authorization(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        nc: u32,
        cnonce: &str,
    ) -> String {
        let mut ha1 = md5_hex(&format!("{}:{}:{}", username, self.realm, password));
        if self.algorithm == DigestAlgorithm::Md5Sess {
            ha1 = md5_hex(&format!("{}:{}:{}", ha1, self.nonce, cnonce));
        }
        let ha2 = md5_hex(&format!("{}:{}", method, uri));
        let nc = format!("{:08x}", nc);

        let response = if self.qop_auth {
            md5_hex(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, self.nonce, nc, cnonce, ha2
            ))
        } else {
            md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2))
        };

        let mut header = format!(
            "Digest username={}, realm={}, nonce={}, uri={}, response=\"{}\"",
            quote(username),
            quote(&self.realm),
            quote(&self.nonce),
            quote(uri),
            response
        );
        if self.algorithm == DigestAlgorithm::Md5Sess {
            header.push_str(", algorithm=MD5-sess");
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque={}", quote(opaque)));
        }
        if self.qop_auth {
            header.push_str(&format!(", qop=auth, nc={}, cnonce=\"{}\"", nc, cnonce));
        }
        header
    }
}

/// Generates a random client nonce.
pub fn generate_cnonce() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// Splits `key=value, key="quoted, value"` pairs, honouring quotes and
/// backslash escapes inside them.
fn split_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = params.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim().trim_start_matches(',').trim().to_string();
        rest = rest[eq + 1..].trim_start();

        let value;
        if let Some(quoted) = rest.strip_prefix('"') {
            let mut unescaped = String::new();
            let mut end = quoted.len();
            let mut chars = quoted.char_indices();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            unescaped.push(escaped);
                        }
                    }
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    _ => unescaped.push(c),
                }
            }
            value = unescaped;
            rest = &quoted[end..];
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            value = rest[..end].trim().to_string();
            rest = &rest[end..];
        }
        rest = rest.trim_start().trim_start_matches(',').trim_start();
        pairs.push((key, value));
    }

    pairs
}

/// Renders `value` as a quoted-string.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Computes the lowercase MD5 hex digest of the input.
fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
