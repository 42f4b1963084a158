#![cfg(unix)]

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

const TIMESLOTS: &str = env!("CARGO_BIN_EXE_assign-timeslots");
const WORKSHOPS: &str = env!("CARGO_BIN_EXE_assign-workshops");

const TIMESLOT_INPUT: &str = "2 3\n1.0 2.0\n5 10 15\n2 4 6\n";
const WORKSHOP_INPUT: &str = "2 3 2\n0 5 2\n5 0 0\n2 0 0\n1 0\n1 1\n";

/// Stand-in for glpsol that copies `report.txt` from the working directory to
/// the `--output` path
const COPY_REPORT: &str = r#"
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
cp report.txt "$out"
"#;

const TIMESLOT_REPORT: &str = "\
Problem:    parte
Rows:       6
Columns:    9 (9 integer, 9 binary)
Non-zeros:  24
Status:     INTEGER OPTIMAL
Objective:  z = 37.5 (MINimum)

   No.   Row name        Activity     Lower bound   Upper bound
------ ------------    ------------- ------------- -------------
     1 z                        37.5
     2 una_franja[1]
                                   1             1             =

   No. Column name       Activity     Lower bound   Upper bound
------ ------------    ------------- ------------- -------------
     1 sin_asignar[3]
                    *              1             0             1
     2 asignado[2,2]
                    *              1             0             1
     3 asignado[2,1]  *  0  0  1
     4 asignado[1,1]  *  1  0  1
     5 asignado[1,2]
                    *              0             0             1
     6 sin_asignar[1]
                    *              0             0             1

Integer feasibility conditions:

End of output
";

struct Setup {
    dir: TempDir,
}

impl Setup {
    /// Sets up a working directory with the model files, an input file and a
    /// fake glpsol script
    fn new(input: &str, script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("parte-2-1.mod"), "end;\n").unwrap();
        fs::write(dir.path().join("parte-2-2.mod"), "end;\n").unwrap();
        fs::write(dir.path().join("input.txt"), input).unwrap();
        fs::write(dir.path().join("fake-glpsol.sh"), script).unwrap();
        Setup { dir }
    }

    fn with_report(self, report: &str) -> Self {
        fs::write(self.path().join("report.txt"), report).unwrap();
        self
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Command running `bin` with the fake glpsol on `input.txt`
    fn command(&self, bin: &str) -> Command {
        let mut cmd = Command::new(bin);
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .args(["input.txt", "output.dat"])
            .args(["--glpsol", "sh", "--solver-arg", "fake-glpsol.sh"]);
        cmd
    }

    fn run(&self, bin: &str) -> Output {
        self.command(bin).output().unwrap()
    }

    fn data_written(&self) -> bool {
        self.path().join("output.dat").exists()
    }
}

fn stdout(out: &Output) -> &str {
    std::str::from_utf8(&out.stdout).unwrap()
}

fn stderr(out: &Output) -> &str {
    std::str::from_utf8(&out.stderr).unwrap()
}

#[test]
fn timeslots_example() {
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT).with_report(TIMESLOT_REPORT);
    let out = setup.run(TIMESLOTS);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "valor óptimo = 37.50, número de variables de decisión = 9, número de restricciones = 5\n\
         BUS 1 asignado a FRANJA 1\n\
         BUS 2 asignado a FRANJA 2\n\
         BUS 3 -> NO ASIGNADO\n"
    );
    assert_eq!(stderr(&out), "");
    let data = fs::read_to_string(setup.path().join("output.dat")).unwrap();
    assert!(data.starts_with("set Autobuses := 1 2 3;\nset Franjas := 1 2;\n"));
    assert!(data.ends_with("end;\n"));
}

#[test]
fn workshops_assignment() {
    let report = "\
Status:     INTEGER OPTIMAL
Objective:  z = 5 (MINimum)

   No. Column name       Activity     Lower bound   Upper bound
------ ------------    ------------- ------------- -------------
     1 Asignado[3,2,2]
                    *              1             0             1
     2 Asignado[1,1,1]
                    *              1             0             1
     3 Asignado[2,2,1]  *  1  0  1
     4 Asignado[2,1,1]  *  0  0  1
";
    let setup = Setup::new(WORKSHOP_INPUT, COPY_REPORT).with_report(report);
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "valor óptimo = 5.00, número de variables de decisión = 18, número de restricciones = 37\n\
         BUS 1 asignado a TALLER 1 en FRANJA 1\n\
         BUS 2 asignado a TALLER 1 en FRANJA 2\n\
         BUS 3 asignado a TALLER 2 en FRANJA 2\n"
    );
}

#[test]
fn workshops_optimal_without_records() {
    let report = "\
Status:     OPTIMAL
Objective:  z = 12.346 (MINimum)

   No. Column name       Activity     Lower bound   Upper bound
------ ------------    ------------- ------------- -------------
     1 Asignado[1,1,1]
                    *              0             0             1

End of output
";
    let setup = Setup::new(WORKSHOP_INPUT, COPY_REPORT).with_report(report);
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "valor óptimo = 12.35, número de variables de decisión = 18, número de restricciones = 37\n"
    );
    assert!(stderr(&out).contains("Asignado[1,1,1]"));
}

#[test]
fn workshops_infeasible() {
    let report = "Status:     INFEASIBLE (FINAL)\nObjective:  z = 0 (MINimum)\n";
    let setup = Setup::new(WORKSHOP_INPUT, COPY_REPORT).with_report(report);
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(7));
    assert_eq!(stdout(&out), "");
    assert!(stderr(&out).starts_with("Error: no optimal value found"));
}

#[test]
fn missing_objective() {
    let report = TIMESLOT_REPORT.replace("Objective:", "Objetivo:");
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT).with_report(&report);
    let out = setup.run(TIMESLOTS);
    assert_eq!(out.status.code(), Some(7));
    assert_eq!(stdout(&out), "");
}

#[test]
fn wrong_argument_count() {
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT);
    let out = Command::new(TIMESLOTS)
        .current_dir(setup.path())
        .arg("input.txt")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"));
    assert_eq!(stdout(&out), "");
}

#[test]
fn missing_input() {
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT);
    fs::remove_file(setup.path().join("input.txt")).unwrap();
    let out = setup.run(TIMESLOTS);
    assert_eq!(out.status.code(), Some(2));
    assert!(!setup.data_written());
}

#[test]
fn missing_model() {
    let setup = Setup::new(WORKSHOP_INPUT, COPY_REPORT);
    fs::remove_file(setup.path().join("parte-2-2.mod")).unwrap();
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("parte-2-2.mod"));
    assert!(!setup.data_written());
}

#[test]
fn format_errors() {
    let setup = Setup::new("2 3\n1.0 2.0\n5 10\n2 4 6\n", COPY_REPORT);
    let out = setup.run(TIMESLOTS);
    assert_eq!(out.status.code(), Some(4));
    assert_eq!(stdout(&out), "");
    assert!(!setup.data_written());

    let setup = Setup::new("2 3 2\n0 5 2\n5 0 0\n2 0 0\n1 0\n", COPY_REPORT);
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(4));
    assert!(!setup.data_written());
}

#[test]
fn glpsol_not_found() {
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT);
    let out = Command::new(TIMESLOTS)
        .current_dir(setup.path())
        .args(["input.txt", "output.dat", "--glpsol", "./no-such-glpsol"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(5));
    assert_eq!(stdout(&out), "");
}

#[test]
fn glpsol_fails() {
    let setup = Setup::new(TIMESLOT_INPUT, "echo 'glp_read_data: syntax error' >&2\nexit 1\n");
    let out = setup.run(TIMESLOTS);
    assert_eq!(out.status.code(), Some(6));
    assert!(stderr(&out).contains("glp_read_data: syntax error"));
    assert_eq!(stdout(&out), "");
}

#[test]
fn report_not_written() {
    let setup = Setup::new(WORKSHOP_INPUT, "exit 0\n");
    let out = setup.run(WORKSHOPS);
    assert_eq!(out.status.code(), Some(6));
    assert_eq!(stdout(&out), "");
}

#[test]
fn glpsol_timeout() {
    let setup = Setup::new(TIMESLOT_INPUT, "sleep 5\n");
    let out = setup
        .command(TIMESLOTS)
        .args(["--timeout", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(6));
    assert_eq!(stdout(&out), "");
}

#[test]
fn explicit_model_path() {
    let setup = Setup::new(TIMESLOT_INPUT, COPY_REPORT).with_report(TIMESLOT_REPORT);
    fs::create_dir(setup.path().join("models")).unwrap();
    fs::rename(
        setup.path().join("parte-2-1.mod"),
        setup.path().join("models/bus.mod"),
    )
    .unwrap();
    let out = setup
        .command(TIMESLOTS)
        .args(["--model", "models/bus.mod"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(stdout(&out).starts_with("valor óptimo = 37.50"));
}
