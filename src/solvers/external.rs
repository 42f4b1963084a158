//! # Solver Interface for the `glpsol` Executable

use std::{
    ffi::{OsStr, OsString},
    fs, io,
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use super::{CapturedOutput, Error, Solve};

/// Name of the report file inside the temporary directory
const REPORT_FILE: &str = "solucion.sol";
const STDOUT_FILE: &str = "glpsol.out";
const STDERR_FILE: &str = "glpsol.err";

/// How often to check whether the solver terminated when a timeout is set
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The GLPK stand-alone solver, called via an external executable
///
/// The solver is called as
/// `<program> [args] --model <model> --data <data> --output <report>`, where the
/// report is written to a temporary directory that is removed before
/// [`Solve::solve`] returns. The output of the solver is captured and only
/// returned as part of errors.
#[derive(Debug, Clone)]
pub struct Glpsol {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl Default for Glpsol {
    fn default() -> Self {
        Glpsol::new("glpsol")
    }
}

impl Glpsol {
    /// Initializes the solver with the executable to call
    ///
    /// If `program` is not a path, it is looked up in `PATH`.
    #[must_use]
    pub fn new<P: AsRef<OsStr>>(program: P) -> Self {
        Glpsol {
            program: program.as_ref().to_owned(),
            args: vec![],
            timeout: None,
        }
    }

    /// Adds an argument that is passed before the model and data arguments
    #[must_use]
    pub fn arg<A: AsRef<OsStr>>(mut self, arg: A) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Adds multiple arguments that are passed before the model and data
    /// arguments
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    /// Sets a wall clock limit after which the solver process is killed
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn command(&self, model: &Path, data: &Path, workdir: &Path) -> io::Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--model")
            .arg(fs::canonicalize(model)?)
            .arg("--data")
            .arg(fs::canonicalize(data)?)
            .arg("--output")
            .arg(workdir.join(REPORT_FILE))
            .stdin(Stdio::null())
            .stdout(fs::File::create(workdir.join(STDOUT_FILE))?)
            .stderr(fs::File::create(workdir.join(STDERR_FILE))?);
        Ok(cmd)
    }

    fn run(&self, model: &Path, data: &Path, workdir: &Path) -> Result<String, Error> {
        let mut cmd = self.command(model, data, workdir)?;
        log::info!("running {cmd:?}");
        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(self.program_name()),
            _ => Error::Spawn {
                program: self.program_name(),
                source: err,
            },
        })?;
        let status = wait(&mut child, self.timeout)?;
        log::info!("solver terminated after {:?}", start.elapsed());
        let Some(status) = status else {
            return Err(Error::Timeout {
                // a timeout is always set if waiting was cut short
                limit: self.timeout.unwrap_or_default(),
                output: read_output(workdir),
            });
        };
        if !status.success() {
            return Err(Error::Failed {
                status,
                output: read_output(workdir),
            });
        }
        match fs::read(workdir.join(REPORT_FILE)) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::MissingReport {
                output: read_output(workdir),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

impl Solve for Glpsol {
    fn signature(&self) -> &'static str {
        "glpsol"
    }

    fn solve(&self, model: &Path, data: &Path) -> Result<String, Error> {
        let workdir = tempfile::Builder::new().prefix("busplan-").tempdir()?;
        let result = self.run(model, data, workdir.path());
        // dropping would also remove the directory, but silently
        if let Err(err) = workdir.close() {
            log::warn!("failed to remove temporary solver directory: {err}");
        }
        result
    }
}

/// Waits for the child to terminate, killing it when the timeout is exceeded
///
/// Returns [`None`] if the child was killed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            if let Err(err) = child.kill() {
                log::warn!("failed to kill solver process: {err}");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_output(workdir: &Path) -> CapturedOutput {
    let read = |file: &str| {
        fs::read(workdir.join(file))
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    };
    CapturedOutput {
        stdout: read(STDOUT_FILE),
        stderr: read(STDERR_FILE),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, path::Path, time::Duration};

    use super::Glpsol;
    use crate::solvers::{Error, Solve};

    /// Sets up a model and data file and a shell script standing in for glpsol
    fn setup(dir: &Path, script: &str) -> Glpsol {
        fs::write(dir.join("model.mod"), "end;\n").unwrap();
        fs::write(dir.join("data.dat"), "end;\n").unwrap();
        fs::write(dir.join("fake-glpsol.sh"), script).unwrap();
        Glpsol::new("sh").arg(dir.join("fake-glpsol.sh"))
    }

    const WRITE_ARGS: &str = r#"
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  echo "arg $1"
  shift
done
echo "Status: OPTIMAL" > "$out"
"#;

    #[test]
    fn report_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let slv = setup(dir.path(), WRITE_ARGS);
        let report = slv
            .solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap();
        assert_eq!(report, "Status: OPTIMAL\n");
    }

    #[test]
    fn temporary_directory_removed() {
        let dir = tempfile::tempdir().unwrap();
        let slv = setup(
            dir.path(),
            &format!(
                "{WRITE_ARGS}\necho \"$(dirname \"$out\")\" > {}\n",
                dir.path().join("workdir.txt").display()
            ),
        );
        slv.solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap();
        let workdir = fs::read_to_string(dir.path().join("workdir.txt")).unwrap();
        assert!(!Path::new(workdir.trim()).exists());
    }

    #[test]
    fn nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let slv = setup(dir.path(), "echo 'model error' >&2\nexit 1\n");
        let err = slv
            .solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap_err();
        let Error::Failed { status, output } = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(status.code(), Some(1));
        assert_eq!(output.stderr, "model error\n");
    }

    #[test]
    fn missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let slv = setup(dir.path(), "echo solving\n");
        let err = slv
            .solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingReport { .. }));
        assert_eq!(err.output().unwrap().stdout, "solving\n");
    }

    #[test]
    fn executable_not_found() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path(), "");
        let err = Glpsol::new(dir.path().join("no-such-glpsol"))
            .solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.output().is_none());
    }

    #[test]
    fn timeout_kills_solver() {
        let dir = tempfile::tempdir().unwrap();
        let slv = setup(dir.path(), "sleep 10\n").timeout(Some(Duration::from_millis(200)));
        let err = slv
            .solve(&dir.path().join("model.mod"), &dir.path().join("data.dat"))
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
