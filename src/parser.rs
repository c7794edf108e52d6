use crate::content::RawContent;
use crate::error::ParseError;

/// First parsing stage: raw content to raw content, e.g. unwrapping a container format.
pub trait PreParser: Send + Sync {
    fn pre_parse(&self, content: RawContent) -> Result<RawContent, ParseError>;
}

/// Second parsing stage: converts pre-parsed content into a typed value.
/// Must be pure; it may run on every load.
pub trait Parser<T>: Send + Sync {
    fn parse(&self, content: RawContent) -> Result<T, ParseError>;
}

/// Pre-parser that hands the content through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreParse;

impl PreParser for NoPreParse {
    fn pre_parse(&self, content: RawContent) -> Result<RawContent, ParseError> {
        Ok(content)
    }
}

impl<F> PreParser for F
where
    F: Fn(RawContent) -> Result<RawContent, ParseError> + Send + Sync,
{
    fn pre_parse(&self, content: RawContent) -> Result<RawContent, ParseError> {
        self(content)
    }
}

/// Decodes binary payloads as UTF-8 text. Text payloads pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8PreParser;

impl PreParser for Utf8PreParser {
    fn pre_parse(&self, content: RawContent) -> Result<RawContent, ParseError> {
        match content {
            RawContent::Binary(bytes) => String::from_utf8(bytes)
                .map(RawContent::Text)
                .map_err(|e| ParseError::with_source("utf-8", e)),
            text => Ok(text),
        }
    }
}

/// Parser used when no parser is supplied: the value is the raw content itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Parser<RawContent> for Identity {
    fn parse(&self, content: RawContent) -> Result<RawContent, ParseError> {
        Ok(content)
    }
}

impl<T, F> Parser<T> for F
where
    F: Fn(RawContent) -> Result<T, ParseError> + Send + Sync,
{
    fn parse(&self, content: RawContent) -> Result<T, ParseError> {
        self(content)
    }
}

/// Parsers backed by serde, one per supported format.
#[cfg(feature = "serde")]
pub mod serde_parsers {
    use std::marker::PhantomData;
    use serde::de::DeserializeOwned;
    use crate::content::RawContent;
    use crate::error::ParseError;
    use crate::parser::Parser;

    macro_rules! serde_parser {
        ($(#[$meta:meta])* $name:ident) => {
            $(#[$meta])*
            pub struct $name<Data> {
                _data: PhantomData<fn() -> Data>,
            }

            impl<Data> $name<Data> {
                pub fn new() -> Self {
                    $name { _data: PhantomData }
                }
            }

            impl<Data> Default for $name<Data> {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<Data> Clone for $name<Data> {
                fn clone(&self) -> Self {
                    Self::new()
                }
            }

            impl<Data> std::fmt::Debug for $name<Data> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        };
    }

    #[cfg(feature = "json")]
    serde_parser!(
        /// Deserializes JSON content
        JsonParser
    );

    #[cfg(feature = "json")]
    impl<Data: DeserializeOwned> Parser<Data> for JsonParser<Data> {
        fn parse(&self, content: RawContent) -> Result<Data, ParseError> {
            serde_json::from_slice::<Data>(content.as_bytes()).map_err(|e| ParseError::with_source("json", e))
        }
    }

    #[cfg(feature = "toml")]
    serde_parser!(
        /// Deserializes TOML content
        TomlParser
    );

    #[cfg(feature = "toml")]
    impl<Data: DeserializeOwned> Parser<Data> for TomlParser<Data> {
        fn parse(&self, content: RawContent) -> Result<Data, ParseError> {
            toml::from_str::<Data>(&content.to_text()).map_err(|e| ParseError::with_source("toml", e))
        }
    }

    #[cfg(feature = "yaml")]
    serde_parser!(
        /// Deserializes YAML content
        YamlParser
    );

    #[cfg(feature = "yaml")]
    impl<Data: DeserializeOwned> Parser<Data> for YamlParser<Data> {
        fn parse(&self, content: RawContent) -> Result<Data, ParseError> {
            serde_yaml::from_slice::<Data>(content.as_bytes()).map_err(|e| ParseError::with_source("yaml", e))
        }
    }

    #[cfg(feature = "xml")]
    serde_parser!(
        /// Deserializes XML content
        XmlParser
    );

    #[cfg(feature = "xml")]
    impl<Data: DeserializeOwned> Parser<Data> for XmlParser<Data> {
        fn parse(&self, content: RawContent) -> Result<Data, ParseError> {
            serde_xml_rs::from_str::<Data>(&content.to_text()).map_err(|e| ParseError::with_source("xml", e))
        }
    }
}
