#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;

    use crate::aggregate::{KindResult, Summary, average, throughput};
    use crate::config::BenchConfig;
    use crate::kind::LockKind;
    use crate::layout::ResultLayout;
    use crate::workload::Profile;

    fn write_result(layout: &ResultLayout, kind: LockKind, tasks: u32, repetition: u32, secs: f64) -> Result<()> {
        layout.ensure_kind_dir(kind)?;
        fs::write(
            layout.result_file(kind, tasks, repetition),
            format!("type: {}\n{:.6} s\n", kind.lock_arg(), secs),
        )?;
        Ok(())
    }

    #[test]
    fn test_throughput_literal_example() -> Result<()> {
        let avg = average(&[1.0, 1.0, 1.0])?;
        assert_eq!(throughput(4, 100_000, avg)?, 400_000.0);
        Ok(())
    }

    #[test]
    fn test_average_and_throughput() -> Result<()> {
        assert_eq!(average(&[1.0, 2.0, 3.0])?, 2.0);
        assert_eq!(throughput(8, 100_000, 2.0)?, 400_000.0);
        assert!(average(&[]).is_err());
        assert!(throughput(1, 100_000, 0.0).is_err());
        assert!(throughput(1, 100_000, f64::NAN).is_err());
        Ok(())
    }

    #[test]
    fn test_kind_result_keeps_samples() -> Result<()> {
        let result = KindResult::from_samples(LockKind::Rcu, 2, 100_000, vec![0.5, 1.0, 1.5])?;
        assert_eq!(result.mean_secs, 1.0);
        assert_eq!(result.throughput, 200_000.0);
        assert_eq!(result.samples.len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_fails_on_missing_repetition() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let layout = ResultLayout::new(dir.path());
        write_result(&layout, LockKind::Mutex, 1, 0, 1.0)?;
        write_result(&layout, LockKind::Mutex, 1, 1, 1.0)?;
        let err = KindResult::load(&layout, LockKind::Mutex, 1, 3, 100_000).unwrap_err();
        assert!(err.to_string().contains("task_1_2.txt"));
        Ok(())
    }

    #[test]
    fn test_collect_builds_one_row_per_task_count() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let layout = ResultLayout::new(dir.path());
        let mut config = BenchConfig::default();
        config.sweep.steps = 3;
        let kinds = [LockKind::Mutex, LockKind::SMutex];
        for tasks in [1, 2, 4] {
            for repetition in 0..3 {
                write_result(&layout, LockKind::Mutex, tasks, repetition, 0.5)?;
                write_result(&layout, LockKind::SMutex, tasks, repetition, 2.0)?;
            }
        }

        let summary = Summary::collect(&config, Profile::Contended, &layout, &kinds)?;
        assert_eq!(summary.rows.len(), 3);
        let row = &summary.rows[2];
        assert_eq!(row.tasks, 4);
        assert_eq!(row.results[0].kind, LockKind::Mutex);
        assert_eq!(row.results[0].throughput, 800_000.0);
        // smutex runs 1e6 iterations but is reported against the common 1e5
        assert_eq!(row.results[1].iterations, 100_000);
        assert_eq!(row.results[1].throughput, 200_000.0);

        config.report_overridden_iterations = true;
        let summary = Summary::collect(&config, Profile::Contended, &layout, &kinds)?;
        assert_eq!(summary.rows[2].results[1].iterations, 1_000_000);
        assert_eq!(summary.rows[2].results[1].throughput, 2_000_000.0);
        Ok(())
    }

    #[test]
    fn test_collect_rejects_kind_outside_profile() {
        let layout = ResultLayout::new("noreading");
        let err = Summary::collect(
            &BenchConfig::default(),
            Profile::NoReading,
            &layout,
            &[LockKind::CoSpinlock],
        )
        .unwrap_err();
        assert!(err.to_string().contains("cospinlock"));
    }
}
