use crate::adt;
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::parser::{self, Control, Instruction, Namespace};
use crate::registry::Registry;
use crate::status::{OVERFLOW, Status};
use crate::store::InstanceStore;
use log::{debug, info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// What the loop should do after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// `/q` was entered.
    Quit,
    /// The input stream was closed.
    EndOfInput,
    /// An operation could not allocate storage.
    Fatal(Status),
}

impl Shutdown {
    /// Process exit status for this shutdown.
    pub fn exit_code(self) -> i32 {
        match self {
            Shutdown::Quit | Shutdown::EndOfInput => 0,
            Shutdown::Fatal(status) => status,
        }
    }
}

/// A single-threaded shell session.
///
/// The interpreter owns the [`Registry`], filled before the session starts and
/// never changed afterwards, and the [`InstanceStore`] that holds the user's
/// ADTs and variables. Each line is parsed, dispatched and reported before the
/// next one is read. Every error except allocation failure is printed and the
/// session carries on.
///
/// Example
/// ```
/// use adt_shell::{Config, Interpreter, Outcome};
/// let mut sh = Interpreter::with_config(Config::silent());
/// let mut out: Vec<u8> = Vec::new();
/// sh.execute_line("new Triplet t", &mut out).unwrap();
/// sh.execute_line("InitTriplet(t, 3, 5, 9)", &mut out).unwrap();
/// assert_eq!(sh.execute_line("/q", &mut out).unwrap(), Outcome::Quit);
/// assert_eq!(String::from_utf8(out).unwrap(), "Status = TRUE/OK (value: 1)\n");
/// ```
pub struct Interpreter {
    registry: Registry,
    store: InstanceStore,
    config: Config,
}

impl Interpreter {
    /// Create an interpreter over a custom set of operations and types.
    pub fn new(registry: Registry, config: Config) -> Self {
        Self {
            registry,
            store: InstanceStore::new(),
            config,
        }
    }

    /// Create an interpreter with every bundled ADT loaded.
    pub fn with_config(config: Config) -> Self {
        let mut registry = Registry::new();
        adt::load_all(&mut registry);
        Self::new(registry, config)
    }

    /// User ADTs and variables created so far.
    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Parse and execute one line of input.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> Result<Outcome> {
        let instruction = parser::parse_line(line)?;
        debug!("parsed {:?}", instruction);
        self.execute(instruction, stdout)
    }

    /// Execute an already parsed instruction.
    pub fn execute(&mut self, instruction: Instruction, stdout: &mut dyn Write) -> Result<Outcome> {
        match instruction {
            Instruction::Control(Control::Quit) => return Ok(Outcome::Quit),
            Instruction::Control(Control::Help) => show_help(stdout)?,
            Instruction::NewVariable { name } => self.store.create_variable(&name)?,
            Instruction::NewAdt { type_name, name } => {
                self.store.create_adt(&name, &type_name, &self.registry)?
            }
            Instruction::Delete {
                namespace: Namespace::Adt,
                name,
            } => self.store.delete_adt(&name)?,
            Instruction::Delete {
                namespace: Namespace::Var,
                name,
            } => self.store.delete_variable(&name)?,
            Instruction::List(Namespace::Adt) => {
                for (type_name, name) in self.store.adts() {
                    writeln!(stdout, "{type_name} {name}")?;
                }
            }
            Instruction::List(Namespace::Var) => {
                for (name, value) in self.store.variables() {
                    writeln!(stdout, "{name} = {value}")?;
                }
            }
            Instruction::Assign { target, value } => {
                self.store.variable(&target)?;
                let value = self.store.resolve(&value)?;
                self.store.set_variable(&target, value)?;
            }
            Instruction::Inspect(name) => {
                // A bare word that is not a variable is not a valid instruction either.
                let value = self
                    .store
                    .variable(&name)
                    .map_err(|_| ShellError::InvalidFormat)?;
                writeln!(stdout, "{value}")?;
            }
            Instruction::Call { name, args } => {
                self.invoke(&name, &args, stdout)?;
            }
        }
        Ok(Outcome::Continue)
    }

    /// Resolve `name`, check the argument count, run the operation and report its status.
    pub fn invoke(&mut self, name: &str, args: &[String], stdout: &mut dyn Write) -> Result<Status> {
        let op = self.registry.instruction(name)?;
        if args.len() != op.arity() {
            return Err(ShellError::ArgumentCount {
                needed: op.arity(),
                given: args.len(),
            });
        }
        let status = op.execute(args, &mut self.store, stdout)?;
        debug!("{} returned {}", name, status);
        op.report(status, stdout)?;
        Ok(status)
    }

    /// Run one line through the failure-isolation policy.
    ///
    /// Recoverable errors are printed and swallowed. Returns the shutdown reason
    /// once the session has to end.
    fn handle_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<Option<Shutdown>> {
        match self.execute_line(line, stdout) {
            Ok(Outcome::Continue) => Ok(None),
            Ok(Outcome::Quit) => {
                info!("quit requested");
                Ok(Some(Shutdown::Quit))
            }
            Err(ShellError::Io(err)) => Err(err.into()),
            Err(err) if err.is_fatal() => {
                warn!("aborting session: {}", err);
                writeln!(stdout, "{err}")?;
                Ok(Some(Shutdown::Fatal(OVERFLOW)))
            }
            Err(err) => {
                debug!("instruction {:?} failed: {}", line, err);
                writeln!(stdout, "{err}")?;
                Ok(None)
            }
        }
    }

    /// Read lines from `input` until `/q`, end of input, or a fatal error.
    ///
    /// The prompt is written before each line so that a piped session produces
    /// the same transcript as an interactive one. Bytes that are not UTF-8 are
    /// replaced, so such a line fails to parse instead of ending the session.
    pub fn run<R: BufRead>(&mut self, mut input: R, stdout: &mut dyn Write) -> anyhow::Result<Shutdown> {
        if self.config.banner {
            writeln!(stdout, "{}", banner())?;
        }
        let mut buf = Vec::new();
        loop {
            write!(stdout, "{}", self.config.prompt)?;
            stdout.flush()?;
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!("end of input");
                return Ok(Shutdown::EndOfInput);
            }
            let raw = String::from_utf8_lossy(&buf);
            let line = raw.strip_suffix('\n').unwrap_or(&*raw);
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(shutdown) = self.handle_line(line, stdout)? {
                return Ok(shutdown);
            }
        }
    }

    /// Interactive Read-Eval-Print Loop on the terminal.
    ///
    /// Ctrl-C discards the current line; Ctrl-D ends the session.
    pub fn repl(&mut self) -> anyhow::Result<Shutdown> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();
        if self.config.banner {
            println!("{}", banner());
        }

        loop {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    if let Some(shutdown) = self.handle_line(&line, &mut stdout)? {
                        return Ok(shutdown);
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    info!("end of input");
                    return Ok(Shutdown::EndOfInput);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

/// Version line printed when a session starts.
fn banner() -> String {
    format!("ADT shell v{}", env!("CARGO_PKG_VERSION"))
}

fn show_help(stdout: &mut dyn Write) -> std::io::Result<()> {
    writeln!(stdout, "\t/q\tQuit")?;
    writeln!(stdout, "\t/?\tHelp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Operation;
    use crate::status::OK;
    use std::io::Cursor;

    /// Adds two values and prints the sum instead of a status line.
    struct Add;

    impl Operation for Add {
        fn arity(&self) -> usize {
            2
        }

        fn execute(&self, args: &[String], store: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
            Ok(store.resolve(&args[0])? + store.resolve(&args[1])?)
        }

        fn report(&self, status: Status, stdout: &mut dyn Write) -> std::io::Result<()> {
            writeln!(stdout, "Result: {status}")
        }
    }

    fn transcript(input: &str) -> (String, Shutdown, Interpreter) {
        let mut sh = Interpreter::with_config(Config::silent());
        let mut out: Vec<u8> = Vec::new();
        let shutdown = sh.run(Cursor::new(input.to_string()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), shutdown, sh)
    }

    fn sorted_lines(s: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = s.lines().collect();
        lines.sort();
        lines
    }

    #[test]
    fn test_quit_stops_before_remaining_lines() {
        let (out, shutdown, sh) = transcript("new var x\n/q\nnew var y\n");
        assert_eq!(shutdown, Shutdown::Quit);
        assert_eq!(shutdown.exit_code(), 0);
        assert_eq!(out, "");
        assert!(sh.store().contains("x"));
        assert!(!sh.store().contains("y"));
    }

    #[test]
    fn test_end_of_input_shuts_down_cleanly() {
        let (_, shutdown, _) = transcript("new var x\n");
        assert_eq!(shutdown, Shutdown::EndOfInput);
        assert_eq!(shutdown.exit_code(), 0);
    }

    #[test]
    fn test_help() {
        let (out, _, _) = transcript("/?\n");
        assert_eq!(out, "\t/q\tQuit\n\t/?\tHelp\n");
    }

    #[test]
    fn test_session_survives_every_kind_of_error() {
        let input = "\
garbage line
Nope(1)
new Heap h
new var x
new var x
SequenceListLength(l)
SequenceListLength(l, x)
x = abc
y = 1
delete adt l
delete var y
x
/q
";
        let (out, shutdown, _) = transcript(input);
        assert_eq!(shutdown, Shutdown::Quit);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Invalid instruction format. Examples: InitTriplet(t, 1, 2, 3), SequenceListLength(l).",
                "Instruction \"Nope\" not found.",
                "Create ADT \"h\" failed. Reason: Target ADT type not supported.",
                "ADT/Variable with name \"x\" already exists.",
                "Search ADT \"l\" failed. Reason: Target ADT not exists.",
                "Invalid argument count: 1 is needed, but 2 is given.",
                "Invalid argument: \"abc\".",
                "Search Variable \"y\" failed. Reason: Target variable not exists.",
                "Delete ADT \"l\" failed. Reason: Target ADT not exists.",
                "Delete Variable \"y\" failed. Reason: Target variable not exists.",
                "0",
            ]
        );
    }

    #[test]
    fn test_domain_errors_are_statuses_not_messages() {
        let (out, _, _) = transcript("new SequenceList l\nnew var x\nSequenceListDelete(l, 1, x)\n");
        assert_eq!(out, "Status = FALSE/ERROR (value: 0)\n");
    }

    #[test]
    fn test_variables_assign_and_inspect() {
        let (out, _, sh) = transcript("new var x\nnew var y\nx = 5\ny = x\ny\nunknown\n");
        assert_eq!(
            out,
            "5\nInvalid instruction format. Examples: InitTriplet(t, 1, 2, 3), SequenceListLength(l).\n"
        );
        assert_eq!(sh.store().variable("y").unwrap(), 5);
    }

    #[test]
    fn test_list_directives() {
        let input = "new var x\nx = 3\nnew var y\nnew SequenceList l\nnew Triplet t\nlist var\nlist adt\n";
        let (out, _, _) = transcript(input);
        assert_eq!(
            sorted_lines(&out),
            vec!["SequenceList l", "Triplet t", "x = 3", "y = 0"]
        );
    }

    #[test]
    fn test_name_reuse_after_delete() {
        let input = "\
new SequenceList l
InitSequenceList(l)
delete adt l
new var l
delete var l
new SequenceList l
SequenceListLength(l)
";
        let (out, _, sh) = transcript(input);
        assert_eq!(out, "Status = TRUE/OK (value: 1)\nStatus = FALSE/ERROR (value: 0)\n");
        assert!(!sh.store().adt("l").unwrap().is_initialized());
    }

    #[test]
    fn test_list_session_end_to_end() {
        let input = "\
new SequenceList a
new SequenceList b
new SequenceList c
new var x
InitSequenceList(a)
InitSequenceList(b)
SequenceListInsert(a, 1, 1)
SequenceListInsert(a, 2, 3)
SequenceListInsert(a, 3, 5)
SequenceListInsert(b, 1, 2)
SequenceListInsert(b, 2, 4)
SequenceListInsert(b, 3, 6)
MergeSequenceList(a, b, c)
SequenceListTraverse(c)
SequenceListLength(c)
LocateElemInSequenceList(c, 4)
GetElemInSequenceList(c, 6, x)
x
";
        let (out, _, _) = transcript(input);
        let ok = "Status = TRUE/OK (value: 1)";
        let mut expected = vec![ok; 9];
        expected.extend(["1 2 3 4 5 6", ok, "Status = 6", "Status = 4", ok, "6"]);
        assert_eq!(out.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_argument_count_checked_before_execution() {
        let mut sh = Interpreter::with_config(Config::silent());
        let mut out: Vec<u8> = Vec::new();
        sh.execute_line("new SequenceList l", &mut out).unwrap();
        sh.execute_line("new var x", &mut out).unwrap();
        sh.execute_line("InitSequenceList(l)", &mut out).unwrap();
        sh.execute_line("SequenceListInsert(l, 1, 9)", &mut out).unwrap();

        let err = sh.execute_line("SequenceListDelete(l, 1)", &mut out).unwrap_err();
        assert!(matches!(err, ShellError::ArgumentCount { needed: 3, given: 2 }));
        let list = sh
            .store()
            .get::<crate::adt::sequence_list::SequenceList>("l")
            .unwrap();
        assert_eq!(list.elements(), Some(&[9][..]));
    }

    #[test]
    fn test_custom_operation_and_report() {
        let mut registry = Registry::new();
        registry.add_instruction("MyAdd", Add);
        let mut sh = Interpreter::new(registry, Config::silent());
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(sh.invoke("MyAdd", &["2".into(), "40".into()], &mut out).unwrap(), 42);
        assert!(matches!(
            sh.execute_line("MyAdd(1)", &mut out),
            Err(ShellError::ArgumentCount { needed: 2, given: 1 })
        ));
        assert!(matches!(
            sh.execute_line("new SequenceList l", &mut out),
            Err(ShellError::ObjectFailed { .. })
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "Result: 42\n");
    }

    #[test]
    fn test_ok_and_true_share_encoding() {
        let mut sh = Interpreter::with_config(Config::silent());
        let mut out: Vec<u8> = Vec::new();
        sh.execute_line("new Triplet t", &mut out).unwrap();
        sh.execute_line("InitTriplet(t, 3, 5, 9)", &mut out).unwrap();
        let init = sh.invoke("InitTriplet", &["t".into(), "3".into(), "5".into(), "9".into()], &mut out);
        let ascending = sh.invoke("IsTripletAscending", &["t".into()], &mut out);
        assert_eq!(init.unwrap(), OK);
        assert_eq!(ascending.unwrap(), OK);
    }

    #[test]
    fn test_banner_and_prompt() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        sh.run(Cursor::new("/q\n"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n>> ", banner()));
    }

    /// Always fails as if the allocator had run dry.
    struct Exhaust;

    impl Operation for Exhaust {
        fn arity(&self) -> usize {
            0
        }

        fn execute(&self, _: &[String], _: &mut InstanceStore, _: &mut dyn Write) -> Result<Status> {
            Err(ShellError::ResourceExhausted("l".to_string()))
        }
    }

    #[test]
    fn test_allocation_failure_ends_session() {
        let mut registry = Registry::new();
        registry.add_instruction("Exhaust", Exhaust);
        let mut sh = Interpreter::new(registry, Config::silent());
        let mut out: Vec<u8> = Vec::new();
        let shutdown = sh
            .run(Cursor::new("Exhaust()\nExhaust()\nnew var x\n"), &mut out)
            .unwrap();
        assert_eq!(shutdown, Shutdown::Fatal(OVERFLOW));
        assert_eq!(shutdown.exit_code(), -2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Out of memory while allocating storage for \"l\".\n"
        );
        assert!(!sh.store().contains("x"));
    }

    #[test]
    fn test_invalid_utf8_line_is_a_format_error() {
        let mut input = b"new var x\n".to_vec();
        input.extend([0xff, 0xfe, b'\n']);
        input.extend(b"x = 7\r\nx\n/q\n");
        let mut sh = Interpreter::with_config(Config::silent());
        let mut out: Vec<u8> = Vec::new();
        let shutdown = sh.run(Cursor::new(input), &mut out).unwrap();
        assert_eq!(shutdown, Shutdown::Quit);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Invalid instruction format. Examples: InitTriplet(t, 1, 2, 3), SequenceListLength(l).\n7\n"
        );
        assert_eq!(sh.store().variable("x").unwrap(), 7);
    }
}
