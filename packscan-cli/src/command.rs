/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Decoded QR text
    Scan(String),
    Print { customer: String, forced: bool },
    Reset(Option<String>),
    Pending(String),
    Status,
    Quit,
    /// Blank line or a command we could not parse
    Ignored(String),
}

impl Input {
    /// Lines starting with `:` are commands, everything else is a scan
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Ignored(String::new());
        }

        let Some(command) = line.strip_prefix(':') else {
            return Input::Scan(line.to_string());
        };

        let (verb, rest) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match (verb.to_lowercase().as_str(), argument) {
            ("print", Some(customer)) => Input::Print { customer, forced: false },
            ("force", Some(customer)) => Input::Print { customer, forced: true },
            ("reset", customer) => Input::Reset(customer),
            ("pending", Some(customer)) => Input::Pending(customer),
            ("status", None) => Input::Status,
            ("quit" | "exit", None) => Input::Quit,
            _ => Input::Ignored(line.to_string()),
        }
    }
}
