// End-to-end runs over real files

use donation_analytics::{run_files, AnalyticsError, RunConfig, RunStats};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ITCONT: &str = "\
C00629618|N|TER|P|201701230300133512|15C|IND|PEREZ, JOHN A|LOS ANGELES|CA|90017|PRINCIPAL|DOUBLE NICKEL ADVISORS|01032017|40|H6CA34245|SA01251735122|1141239|||2012520171368850783
C00177436|N|M2|P|201702039042410894|15|IND|DEEHAN, WILLIAM N|ALPHARETTA|GA|300047357|UNUM|SVP, SALES, CL|01312017|384||PR2283873845050|1147350||P/R DEDUCTION ($192.00 BI-WEEKLY)|4020820171370029337
C00384818|N|M2|P|201702039042412112|15|IND|ABBOTT, JOSEPH|WOONSOCKET|RI|028956146|CVS HEALTH|VP, RETAIL PHARMACY OPS|01122017|250||2017020211435-887|1147467|||4020820171370030285
C00177436|N|M2|P|201702039042410893|15|IND|SABOURIN, JAMES|LOOKOUT MOUNTAIN|GA|028956146|UNUM|SVP, CORPORATE COMMUNICATIONS|01312017|230||PR1890575345050|1147350||P/R DEDUCTION ($115.00 BI-WEEKLY)|4020820171370029335
C00177436|N|M2|P|201702039042410895|15|IND|JEROME, CHRISTOPHER|LOOKOUT MOUNTAIN|GA|307502818|UNUM|EVP, GLOBAL SERVICES|10312017|384||PR2283905245050|1147350||P/R DEDUCTION ($192.00 BI-WEEKLY)|4020820171370029342
C00384516|N|M2|P|201702039042410894|15|IND|SABOURIN, JAMES|LOOKOUT MOUNTAIN|GA|028956146|UNUM|SVP, SALES, CL|01312018|384||PR2283873845050|1147350||P/R DEDUCTION ($192.00 BI-WEEKLY)|4020820171370029337
C00177436|N|M2|P|201702039042410894|15|IND|DEEHAN, WILLIAM N|ALPHARETTA|GA|028956146|UNUM|SVP, SALES, CL|01312017|384||PR2283873845050|1147350||P/R DEDUCTION ($192.00 BI-WEEKLY)|4020820171370029337
C00384516|N|M2|P|201702039042412112|15|IND|ABBOTT, JOSEPH|WOONSOCKET|RI|028956146|CVS HEALTH|EVP, HEAD OF RETAIL OPERATIONS|01122018|333||2017020211435-910|1147467|||4020820171370030287
C00384516|N|M2|P|201702039042410893|15|IND|SABOURIN, JAMES|LOOKOUT MOUNTAIN|GA|028956146|UNUM|SVP, CORPORATE COMMUNICATIONS|01312018|230||PR1890575345050|1147350||P/R DEDUCTION ($115.00 BI-WEEKLY)|4020820171370029335
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn setup(percentile: &str) -> (TempDir, RunConfig) {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "itcont.txt", ITCONT);
    let percentile = write(dir.path(), "percentile.txt", percentile);
    let output = dir.path().join("repeat_donors.txt");
    (dir, RunConfig::new(input, percentile, output))
}

#[test]
fn test_sample_run_produces_expected_rows() {
    let (_dir, config) = setup("30\n");

    let stats = run_files(&config).unwrap();

    let output = fs::read_to_string(&config.output).unwrap();
    assert_eq!(
        output,
        "C00384516|02895|2018|384|384|1\n\
         C00384516|02895|2018|333|717|2\n\
         C00384516|02895|2018|230|947|3\n"
    );
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.records_read, 9);
    assert_eq!(stats.distinct_donors, 5);
    assert_eq!(stats.distinct_groups, 1);
    assert_eq!(stats.rejected.get("not_individual"), Some(&1));
}

#[test]
fn test_summary_json_written_when_configured() {
    let (dir, config) = setup("30");
    let summary_path = dir.path().join("summary.json");
    let config = config.with_summary(&summary_path);

    let stats = run_files(&config).unwrap();

    let json = fs::read_to_string(&summary_path).unwrap();
    let parsed: RunStats = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, stats);
}

#[test]
fn test_bad_percentile_is_fatal_and_creates_no_output() {
    let (_dir, config) = setup("fifty");

    let err = run_files(&config).unwrap_err();

    assert!(matches!(err, AnalyticsError::InvalidPercentile { .. }));
    assert!(!config.output.exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let (dir, mut config) = setup("50");
    config.input = dir.path().join("does_not_exist.txt");

    let err = run_files(&config).unwrap_err();

    assert!(matches!(err, AnalyticsError::Io { .. }));
    assert!(!config.output.exists());
}
