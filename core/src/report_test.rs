#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};

    use crate::aggregate::{KindResult, Summary, SummaryRow};
    use crate::kind::LockKind;
    use crate::report::{csv_header, render_csv, write_csv, write_json};
    use crate::workload::Profile;

    fn summary(kinds: &[LockKind], tasks: &[u32]) -> Result<Summary> {
        let mut rows = Vec::new();
        for &t in tasks {
            let mut results = Vec::new();
            for &kind in kinds {
                results.push(KindResult::from_samples(kind, t, 100_000, vec![1.0, 1.0, 1.0])?);
            }
            rows.push(SummaryRow { tasks: t, results });
        }
        Ok(Summary {
            profile: Profile::Contended,
            kinds: kinds.to_vec(),
            rows,
        })
    }

    #[test]
    fn test_header_matches_documented_columns() -> Result<()> {
        let s = summary(&LockKind::ALL, &[1])?;
        assert_eq!(csv_header(&s), "tasks,rcu,mutex,comutex,spinlock,cospinlock,smutex,cosmutex");
        Ok(())
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_task_count() -> Result<()> {
        let s = summary(&LockKind::ALL, &[1, 2, 4])?;
        let csv = render_csv(&s);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].matches("tasks").count(), 1);
        assert_eq!(
            lines[3],
            "4,400000.0,400000.0,400000.0,400000.0,400000.0,400000.0,400000.0"
        );
        assert!(csv.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_write_csv_creates_parent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out").join("res.csv");
        let s = summary(&[LockKind::Rcu, LockKind::CoMutex], &[1])?;
        write_csv(&path, &s)?;
        assert_eq!(fs::read_to_string(&path)?, "tasks,rcu,comutex\n1,100000.0,100000.0\n");
        Ok(())
    }

    #[test]
    fn test_write_json_includes_samples() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("summary.json");
        let s = summary(&[LockKind::CoSMutex], &[2])?;
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        write_json(&path, &s, at)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["profile"], "contended");
        let result = &value["rows"][0]["results"][0];
        assert_eq!(result["kind"], "cosmutex");
        assert_eq!(result["throughput"], 200_000.0);
        assert_eq!(result["samples"].as_array().map(|a| a.len()), Some(3));
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_buffered_write_errors_surface() -> Result<()> {
        let s = summary(&[LockKind::Mutex], &[1])?;
        let full = std::path::Path::new("/dev/full");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let err = write_json(full, &s, at).unwrap_err();
        assert!(err.to_string().contains("/dev/full"));
        let err = write_csv(full, &s).unwrap_err();
        assert!(err.to_string().contains("/dev/full"));
        Ok(())
    }
}
