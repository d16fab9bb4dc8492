//! Unit tests for the command-line surface.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rstest::{fixture, rstest};

use super::*;
use crate::error::{GenerationError, SchemaError};

const PAYMENT_XSD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
             targetNamespace="urn:example:pain">
    <xs:element name="Document">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="MsgId" type="xs:string"/>
                <xs:element name="Amt" type="xs:decimal"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
    <xs:element name="Receipt" type="xs:string"/>
</xs:schema>"#;

struct Workspace {
    path: Utf8PathBuf,
    dir: Dir,
}

impl Workspace {
    fn file(&self, name: &str) -> String {
        self.path.join(name).into_string()
    }

    fn read(&self, name: &str) -> String {
        self.dir.read_to_string(name).expect("output readable")
    }
}

#[fixture]
fn workspace(#[default("cli")] name: &str) -> Workspace {
    let path = Utf8PathBuf::from("target")
        .join("xsd-sample-tests")
        .join(format!("{name}-{}", std::process::id()));
    let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open working dir");
    root.create_dir_all(&path).expect("create workspace");
    let dir = Dir::open_ambient_dir(&path, ambient_authority()).expect("open workspace");
    dir.write("payment.xsd", PAYMENT_XSD).expect("write schema");
    Workspace { path, dir }
}

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("xsd-sample").chain(args.iter().copied()))
        .expect("arguments parse")
}

#[test]
fn output_defaults_to_output_xml() {
    let args = parse(&["schema.xsd"]);

    assert_eq!(args.schema().as_str(), "schema.xsd");
    assert_eq!(args.output().as_str(), DEFAULT_OUTPUT);
    assert_eq!(args.report(), None);
}

#[test]
fn short_and_long_flags_are_accepted() {
    let args = parse(&["schema.xsd", "-o", "out.xml", "-r", "Receipt", "--seed", "9"]);

    assert_eq!(args.output().as_str(), "out.xml");
    assert_eq!(args.root(), Some("Receipt"));
    assert_eq!(args.seed(), Some(9));

    let options = args.generation_options();
    assert_eq!(options.root(), Some("Receipt"));
    assert_eq!(options.seed(), Some(9));
}

#[test]
fn schema_argument_is_required() {
    assert!(CliArgs::try_parse_from(["xsd-sample"]).is_err());
}

#[test]
fn seed_must_be_numeric() {
    assert!(CliArgs::try_parse_from(["xsd-sample", "schema.xsd", "--seed", "abc"]).is_err());
}

#[rstest]
fn run_writes_document_and_report(#[with("cli-run")] workspace: Workspace) {
    let schema = workspace.file("payment.xsd");
    let output = workspace.file("payment.xml");
    let report = workspace.file("report.json");
    let args = parse(&[&schema, "--output", &output, "--seed", "5", "--report", &report]);

    let summary = run(&args).expect("run succeeds");

    assert_eq!(summary.root, "Document");
    assert_eq!(summary.seed, 5);
    assert_eq!(summary.element_count, 3);
    let xml = workspace.read("payment.xml");
    assert!(xml.contains(r#"<Document xmlns="urn:example:pain">"#));
    assert!(workspace.read("report.json").contains("\"elementCount\": 3"));
}

#[rstest]
fn run_is_reproducible_for_a_seed(#[with("cli-seed")] workspace: Workspace) {
    let schema = workspace.file("payment.xsd");
    let first = workspace.file("first.xml");
    let second = workspace.file("second.xml");

    run(&parse(&[&schema, "-o", &first, "--seed", "11"])).expect("first run");
    run(&parse(&[&schema, "-o", &second, "--seed", "11"])).expect("second run");

    assert_eq!(workspace.read("first.xml"), workspace.read("second.xml"));
}

#[rstest]
fn missing_root_writes_nothing(#[with("cli-missing-root")] workspace: Workspace) {
    let schema = workspace.file("payment.xsd");
    let output = workspace.file("never.xml");

    let err = run(&parse(&[&schema, "-o", &output, "-r", "Invoice"])).expect_err("run fails");

    assert_eq!(
        err,
        CliError::Generation {
            source: GenerationError::MissingRoot {
                name: "Invoice".to_owned()
            }
        }
    );
    assert!(!workspace.dir.exists("never.xml"));
}

#[rstest]
fn unreadable_schema_is_reported(#[with("cli-no-schema")] workspace: Workspace) {
    let schema = workspace.file("absent.xsd");

    let err = run(&parse(&[&schema])).expect_err("run fails");

    assert!(matches!(
        err,
        CliError::Schema {
            source: SchemaError::Io { .. }
        }
    ));
}

#[test]
fn success_message_names_output_and_seed() {
    let summary = RunSummary {
        output: Utf8PathBuf::from("statement.xml"),
        root: "Document".to_owned(),
        seed: 2026,
        element_count: 12,
        warning_count: 1,
    };

    assert_eq!(
        success_message(&summary),
        "Wrote <Document> sample to statement.xml (seed=2026, elements=12, warnings=1)"
    );
}
