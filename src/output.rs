use std::fs;
use std::io::Write;

use eyre::Context;
use itertools::Itertools;
use serde::Serialize;

use crate::types::{EscalationLevel, EscalationPolicy};

pub mod tfstate;
pub mod tree;

use self::tfstate::TfStateExportData;
use self::tree::TreePrinter;

/// Destination meaning standard output.
pub const STDOUT: &str = "-";

const CSV_HEADER: [&str; 5] = [
    "Escalation Policy ID",
    "Escalation Policy",
    "depth",
    "name",
    "email",
];

/// One row per on-call person, shared by the CSV and JSON listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OnCallRow<'a> {
    id: &'a str,
    escalation_policy: &'a str,
    depth: u32,
    user_name: &'a str,
    user_email: &'a str,
}

fn on_call_rows(
    policies: &[EscalationPolicy],
) -> impl Iterator<Item = OnCallRow<'_>> {
    policies.iter().flat_map(|policy| {
        policy.levels.iter().flat_map(move |level| {
            level.people.iter().map(move |user| OnCallRow {
                id: &policy.id,
                escalation_policy: &policy.name,
                depth: level.index,
                user_name: &user.name,
                user_email: &user.email,
            })
        })
    })
}

pub fn build_tree_output(policies: &[EscalationPolicy]) -> String {
    let mut tree = TreePrinter::default();

    for policy in policies {
        let oncalls = tree
            .add_line(format!("Escalation Policy - {}", policy.name))
            .add_line("Oncalls");

        for level in &policy.levels {
            oncalls.add_line(level_label(level));
        }
    }

    tree.render()
}

fn level_label(level: &EscalationLevel) -> String {
    format!(
        "Level {} - {}",
        level.index,
        level.people.iter().map(|user| user.name.as_str()).join(", ")
    )
}

pub fn build_csv_output(policies: &[EscalationPolicy]) -> eyre::Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(vec![]);

    writer.write_record(CSV_HEADER)?;

    for row in on_call_rows(policies) {
        let depth = row.depth.to_string();

        writer.write_record([
            row.id,
            row.escalation_policy,
            depth.as_str(),
            row.user_name,
            row.user_email,
        ])?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|err| eyre::eyre!("Unable to flush CSV output: {}", err.error()))?;

    Ok(String::from_utf8(buffer)?)
}

pub fn build_json_output(
    policies: &[EscalationPolicy],
) -> eyre::Result<String> {
    let rows: Vec<OnCallRow<'_>> = on_call_rows(policies).collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn build_tfstate_output(
    policies: &[EscalationPolicy],
) -> eyre::Result<String> {
    let export: TfStateExportData = policies.iter().collect();

    Ok(serde_json::to_string_pretty(&export)?)
}

/// Writes `contents` to `path`, or to stdout when `path` is `-`.
///
/// A missing trailing newline is added; empty contents write nothing.
pub fn write_file(path: &str, contents: &str) -> eyre::Result<()> {
    let needs_newline = !contents.is_empty() && !contents.ends_with('\n');

    if path == STDOUT {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        if needs_newline {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;

        return Ok(());
    }

    let mut contents = contents.to_owned();
    if needs_newline {
        contents.push('\n');
    }

    fs::write(path, contents)
        .wrap_err_with(|| format!("Unable to write output to {path}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use test_case::test_case;

    use super::*;
    use crate::types::OnCallUser;

    fn alice() -> OnCallUser {
        OnCallUser::new("U1", "Alice")
    }

    fn bob() -> OnCallUser {
        OnCallUser::new("U2", "Bob")
    }

    fn sample() -> Vec<EscalationPolicy> {
        vec![
            EscalationPolicy::new("P1", "Checkout")
                .with_level([alice()])
                .with_level([bob(), alice()]),
            EscalationPolicy::new("P2", "Platform")
                .with_level([bob()])
                .with_level([]),
        ]
    }

    #[test]
    fn single_policy_tree() {
        let policies =
            vec![EscalationPolicy::new("P1", "A").with_level([bob()])];

        let expected = indoc! {"
            └─ Escalation Policy - A
               └─ Oncalls
                  └─ Level 1 - Bob
        "};

        assert_eq!(build_tree_output(&policies), expected);
    }

    #[test]
    fn multi_policy_tree() {
        let expected = [
            "├─ Escalation Policy - Checkout",
            "│  └─ Oncalls",
            "│     ├─ Level 1 - Alice",
            "│     └─ Level 2 - Bob, Alice",
            "└─ Escalation Policy - Platform",
            "   └─ Oncalls",
            "      ├─ Level 1 - Bob",
            "      └─ Level 2 - ",
            "",
        ]
        .join("\n");

        assert_eq!(build_tree_output(&sample()), expected);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(build_tree_output(&[]), "");
    }

    #[test]
    fn policy_without_levels_keeps_oncalls_node() {
        let policies = vec![EscalationPolicy::new("P1", "Quiet")];

        assert_eq!(
            build_tree_output(&policies),
            "└─ Escalation Policy - Quiet\n   └─ Oncalls\n"
        );
    }

    #[test_case(0 ; "no levels")]
    #[test_case(1 ; "one level")]
    #[test_case(4 ; "four levels")]
    fn line_count(levels: usize) {
        let policy = (0..levels).fold(EscalationPolicy::new("P1", "A"), |policy, _| {
            policy.with_level([alice()])
        });
        let policies = vec![policy.clone(), policy.clone(), policy];

        let output = build_tree_output(&policies);

        assert_eq!(output.lines().count(), 3 * (2 + levels));
    }

    #[test]
    fn only_last_root_uses_closing_branch() {
        let policies: Vec<EscalationPolicy> = (1..=4)
            .map(|idx| EscalationPolicy::new(format!("P{idx}"), format!("Policy {idx}")))
            .collect();

        let output = build_tree_output(&policies);
        let roots: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Escalation Policy"))
            .collect();

        assert_eq!(roots.len(), 4);
        assert!(roots[..3].iter().all(|line| line.starts_with("├─ ")));
        assert!(roots[3].starts_with("└─ "));
    }

    #[test]
    fn repeated_names_are_not_collapsed() {
        let policies = vec![EscalationPolicy::new("P1", "A")
            .with_level([alice(), alice()])
            .with_level([alice()])];

        let output = build_tree_output(&policies);

        assert!(output.contains("Level 1 - Alice, Alice\n"));
        assert!(output.contains("Level 2 - Alice\n"));
    }

    #[test]
    fn csv_rows() {
        let expected = indoc! {"
            Escalation Policy ID,Escalation Policy,depth,name,email
            P1,Checkout,1,Alice,alice@example.com
            P1,Checkout,2,Bob,bob@example.com
            P1,Checkout,2,Alice,alice@example.com
            P2,Platform,1,Bob,bob@example.com
        "};

        assert_eq!(build_csv_output(&sample()).unwrap(), expected);
    }

    #[test]
    fn json_rows() {
        let output = build_json_output(&sample()).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[1],
            serde_json::json!({
                "id": "P1",
                "escalationPolicy": "Checkout",
                "depth": 2,
                "userName": "Bob",
                "userEmail": "bob@example.com"
            })
        );
    }

    #[test]
    fn empty_json_rows() {
        assert_eq!(build_json_output(&[]).unwrap(), "[]");
    }

    #[test]
    fn tfstate_output_is_pretty() {
        let expected = indoc! {r#"
            {
              "escalation_policies": {
                "Checkout": "P1",
                "Platform": "P2"
              }
            }
        "#};

        assert_eq!(build_tfstate_output(&sample()).unwrap(), expected.trim());
    }

    #[test]
    fn empty_tfstate_output() {
        let output = build_tfstate_output(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value, serde_json::json!({ "escalation_policies": {} }));
    }
}
