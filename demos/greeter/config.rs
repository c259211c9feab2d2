use std::time::Duration;

use fieldfig::{Configure, Fields, Tags};

/// Configuration for the greeter demo.
#[derive(Debug, Default)]
pub struct GreeterConfig {
    pub greeting: String,
    pub name: String,
    pub repeat: u8,
    pub pause: Duration,
    pub shout: bool,
    pub log_level: String,
    pub server: ServerConfig,
}

/// Pretend upstream the greeting is posted to.
#[derive(Debug, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
}

impl Configure for GreeterConfig {
    fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
        fields.field(
            "greeting",
            Tags::new().alias("-g").default("Hello").help("Greeting word"),
            &mut self.greeting,
        );
        fields.field(
            "name",
            Tags::new()
                .alias("-n")
                .help("Who to greet")
                .validate("required"),
            &mut self.name,
        );
        fields.field(
            "repeat",
            Tags::new()
                .default("1")
                .help("How many times to greet")
                .validate("gte=1,lte=10"),
            &mut self.repeat,
        );
        fields.field(
            "pause",
            Tags::new().default("0s").help("Pause between greetings"),
            &mut self.pause,
        );
        fields.field("shout", Tags::new().help("Upper-case the greeting"), &mut self.shout);
        fields.field(
            "log_level",
            Tags::new()
                .flag("log")
                .env("GREETER_LOG")
                .toml("-")
                .default("info")
                .help("Log filter directive")
                .validate("oneofci=trace debug info warn error"),
            &mut self.log_level,
        );
        fields.nested("server", Tags::new(), &mut self.server);
    }
}

impl Configure for ServerConfig {
    fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
        fields.field(
            "host",
            Tags::new().default("localhost").help("Upstream host"),
            &mut self.host,
        );
        fields.field(
            "port",
            Tags::new().default("8080").validate("gte=1"),
            &mut self.port,
        );
        fields.field(
            "APIKey",
            Tags::new().secret().help("Upstream API key"),
            &mut self.api_key,
        );
    }
}
