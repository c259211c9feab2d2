#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use crate::binder::{Configure, Fields};
    use crate::types::Tags;

    // -- End-to-end fixture: one top-level value and one nested value --------

    #[derive(Debug, Default, PartialEq)]
    pub struct SimpleConfig {
        pub value: String,
        pub nested: NestedConfig,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct NestedConfig {
        pub value: String,
    }

    impl Configure for SimpleConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("value", Tags::new().default("x"), &mut self.value);
            fields.nested("nested", Tags::new(), &mut self.nested);
        }
    }

    impl Configure for NestedConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("value", Tags::new(), &mut self.value);
        }
    }

    // -- Overrides, aliases, globals, disabled sources ------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct DeepConfig {
        pub log_level: String,
        pub server: ServerConfig,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        pub tls: TlsConfig,
        pub timeout: Duration,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct TlsConfig {
        pub enabled: bool,
        pub name: String,
        pub internal: String,
    }

    impl Configure for DeepConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field(
                "log_level",
                Tags::new()
                    .flag("level")
                    .alias("-l")
                    .env("LOGGING_LEVEL")
                    .default("INFO")
                    .help("Log verbosity"),
                &mut self.log_level,
            );
            fields.nested("server", Tags::new(), &mut self.server);
        }
    }

    impl Configure for ServerConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("host", Tags::new().default("localhost"), &mut self.host);
            fields.field(
                "port",
                Tags::new().default("8080").validate("gte=1"),
                &mut self.port,
            );
            fields.nested("tls", Tags::new().toml("-"), &mut self.tls);
            fields.field(
                "timeout",
                Tags::new().env("-").toml("-").default("30s"),
                &mut self.timeout,
            );
        }
    }

    impl Configure for TlsConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("enabled", Tags::new(), &mut self.enabled);
            fields.field("name", Tags::new().global(), &mut self.name);
            fields.field("internal", Tags::skip(), &mut self.internal);
        }
    }

    // -- Optional section ------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct OptionalConfig {
        pub extra: Option<ExtraConfig>,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct ExtraConfig {
        pub count: u32,
    }

    impl Configure for OptionalConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.optional("extra", Tags::new(), &mut self.extra);
        }
    }

    impl Configure for ExtraConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("count", Tags::new(), &mut self.count);
        }
    }

    // -- Validation ------------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct RulesConfig {
        pub required_value: String,
        pub alphanumeric: String,
        pub contains: String,
        pub number_between_0_to_10: i32,
    }

    impl Configure for RulesConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field(
                "required_value",
                Tags::new().validate("required"),
                &mut self.required_value,
            );
            fields.field(
                "alphanumeric",
                Tags::new().validate("alphanum"),
                &mut self.alphanumeric,
            );
            fields.field(
                "contains",
                Tags::new().validate("contains=MustContain"),
                &mut self.contains,
            );
            fields.field(
                "number_between_0_to_10",
                Tags::new().validate("gte=0,lte=10"),
                &mut self.number_between_0_to_10,
            );
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct NestedRulesConfig {
        pub database: DatabaseConfig,
    }

    impl Configure for NestedRulesConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.nested("database", Tags::new(), &mut self.database);
        }
    }

    /// A database section whose user is required but missing.
    pub fn nested_rules_config() -> NestedRulesConfig {
        NestedRulesConfig {
            database: DatabaseConfig {
                user: String::new(),
                password: "hunter21".into(),
            },
        }
    }

    // -- Marshaling ------------------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct SecretConfig {
        pub name: String,
        pub verbose: bool,
        pub database: DatabaseConfig,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct DatabaseConfig {
        pub user: String,
        pub password: String,
    }

    impl Configure for SecretConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("name", Tags::new(), &mut self.name);
            fields.field("verbose", Tags::new().alias("-v"), &mut self.verbose);
            fields.nested("database", Tags::new(), &mut self.database);
        }
    }

    impl Configure for DatabaseConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("user", Tags::new().validate("required"), &mut self.user);
            fields.field("password", Tags::new().secret(), &mut self.password);
        }
    }

    pub fn secret_config() -> SecretConfig {
        SecretConfig {
            name: "svc".into(),
            verbose: false,
            database: DatabaseConfig {
                user: "admin".into(),
                password: "hunter21".into(),
            },
        }
    }

    // -- Flag collisions -------------------------------------------------------

    /// Two siblings that both claim `--value`.
    #[derive(Debug, Default, PartialEq)]
    pub struct DuplicateConfig {
        pub value: String,
        pub other: String,
    }

    impl Configure for DuplicateConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("value", Tags::new(), &mut self.value);
            fields.field("other", Tags::new().flag("value"), &mut self.other);
        }
    }

    /// The same leaf name under two different sections.
    #[derive(Debug, Default, PartialEq)]
    pub struct TwinConfig {
        pub first: NestedConfig,
        pub second: NestedConfig,
    }

    impl Configure for TwinConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.nested("first", Tags::new(), &mut self.first);
            fields.nested("second", Tags::new(), &mut self.second);
        }
    }

    // -- Custom initialisms ----------------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct InitialismConfig {
        pub k8s_api_token: String,
    }

    impl Configure for InitialismConfig {
        fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
            fields.field("K8SAPIToken", Tags::new(), &mut self.k8s_api_token);
        }
    }
}
