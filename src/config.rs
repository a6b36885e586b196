use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "output.asm";

pub const USAGE: &str = "Usage: simplelang [INPUT] [OUTPUT]\n       simplelang [INPUT] -o OUTPUT\n\nWithout INPUT the built-in example program is compiled.\nOUTPUT defaults to output.asm.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Help requested")]
    HelpRequested,
    #[error("Missing value after {flag}")]
    MissingValue { flag: String },
    #[error("Unknown option '{option}'")]
    UnknownOption { option: String },
    #[error("Unexpected argument '{argument}'")]
    UnexpectedArgument { argument: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source file; `None` selects the built-in example program.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut positionals = Vec::new();
        let mut output = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(ConfigError::HelpRequested),
                "--output" | "-o" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue { flag: arg.clone() })?;
                    output = Some(PathBuf::from(value));
                }
                "-" => positionals.push(arg),
                _ if arg.starts_with('-') => {
                    return Err(ConfigError::UnknownOption { option: arg });
                }
                _ => positionals.push(arg),
            }
        }

        let mut positionals = positionals.into_iter();
        let input = positionals.next().map(PathBuf::from);
        let positional_output = positionals.next();
        if let Some(argument) = positionals.next() {
            return Err(ConfigError::UnexpectedArgument { argument });
        }
        if let (Some(_), Some(argument)) = (&output, &positional_output) {
            return Err(ConfigError::UnexpectedArgument {
                argument: argument.clone(),
            });
        }

        Ok(Self {
            input,
            output: output
                .or_else(|| positional_output.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        Config::from_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]), Ok(Config::default()));
    }

    #[test]
    fn reads_input_and_output_positionally() {
        let config = parse(&["prog.sl", "prog.asm"]).expect("valid args");
        assert_eq!(config.input, Some(PathBuf::from("prog.sl")));
        assert_eq!(config.output, PathBuf::from("prog.asm"));
    }

    #[test]
    fn output_flag_overrides_default() {
        let config = parse(&["-o", "out.asm", "prog.sl"]).expect("valid args");
        assert_eq!(config.input, Some(PathBuf::from("prog.sl")));
        assert_eq!(config.output, PathBuf::from("out.asm"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            parse(&["--output"]),
            Err(ConfigError::MissingValue {
                flag: "--output".to_string()
            })
        );
        assert_eq!(
            parse(&["--verbose"]),
            Err(ConfigError::UnknownOption {
                option: "--verbose".to_string()
            })
        );
        assert_eq!(
            parse(&["a", "b", "c"]),
            Err(ConfigError::UnexpectedArgument {
                argument: "c".to_string()
            })
        );
        assert_eq!(
            parse(&["a", "b", "-o", "c"]),
            Err(ConfigError::UnexpectedArgument {
                argument: "b".to_string()
            })
        );
        assert_eq!(parse(&["-h"]), Err(ConfigError::HelpRequested));
    }
}
