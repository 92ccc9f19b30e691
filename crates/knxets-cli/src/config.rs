use knxets_core::{parse_group_address_style, GroupAddressStyle};

use crate::cli::Args;

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub password: Option<String>,
    pub group_style: GroupAddressStyle,
    pub compact: bool,
}

impl CliConfig {
    pub fn from_args(args: &Args) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve(args: &Args, env: impl Fn(&str) -> Option<String>) -> Self {
        let password = args
            .password
            .clone()
            .or_else(|| env("KNXETS_PASSWORD"))
            .filter(|value| !value.is_empty());
        let group_style = args
            .group_style
            .clone()
            .or_else(|| env("KNXETS_GROUP_STYLE"))
            .map(|value| parse_group_address_style(&value))
            .unwrap_or_default();
        let compact = args.compact
            || env("KNXETS_COMPACT")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false);

        Self {
            password,
            group_style,
            compact,
        }
    }
}
