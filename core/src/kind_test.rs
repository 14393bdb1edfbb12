#[cfg(test)]
mod tests {
    use crate::kind::{Backend, LockKind, canonical_order};
    use crate::workload::{Profile, Weight, Workload};

    #[test]
    fn test_labels_follow_column_order() {
        let labels: Vec<&str> = LockKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(
            labels,
            ["rcu", "mutex", "comutex", "spinlock", "cospinlock", "smutex", "cosmutex"]
        );
    }

    #[test]
    fn test_lock_arg_and_backend() {
        assert_eq!(LockKind::SMutex.lock_arg(), "sharedmutex");
        assert_eq!(LockKind::CoSMutex.lock_arg(), "sharedmutex");
        assert_eq!(LockKind::CoSpinlock.lock_arg(), "spinlock");
        assert_eq!(LockKind::Rcu.backend(), Backend::Colocking);
        assert_eq!(LockKind::Mutex.backend(), Backend::ThreadPool);
        assert_eq!(LockKind::CoMutex.backend(), Backend::Colocking);
    }

    #[test]
    fn test_parse_kind_is_case_insensitive() {
        assert_eq!("CoSpinLock".parse::<LockKind>().unwrap(), LockKind::CoSpinlock);
        let err = "rwlock".parse::<LockKind>().unwrap_err();
        assert!(err.to_string().contains("unknown lock kind 'rwlock'"));
    }

    #[test]
    fn test_canonical_order_dedups() {
        let kinds = canonical_order(&[LockKind::CoSMutex, LockKind::Rcu, LockKind::CoSMutex, LockKind::Mutex]);
        assert_eq!(kinds, vec![LockKind::Rcu, LockKind::Mutex, LockKind::CoSMutex]);
    }

    #[test]
    fn test_contended_profile_workloads() {
        let profile = Profile::Contended;
        assert_eq!(profile.kinds(), LockKind::ALL.to_vec());
        let mutex = profile.workload(LockKind::CoSpinlock).unwrap();
        assert_eq!((mutex.read.resolve(8), mutex.write.resolve(8)), (0, 8));
        let smutex = profile.workload(LockKind::SMutex).unwrap();
        assert_eq!((smutex.read.resolve(8), smutex.write.resolve(8)), (8, 1));
        let rcu = profile.workload(LockKind::Rcu).unwrap();
        assert_eq!((rcu.read.resolve(8), rcu.write.resolve(8)), (8, 0));
    }

    #[test]
    fn test_no_reading_profile_skips_spinlocks() {
        let profile = Profile::NoReading;
        assert_eq!(
            profile.kinds(),
            vec![LockKind::Rcu, LockKind::Mutex, LockKind::CoMutex, LockKind::SMutex, LockKind::CoSMutex]
        );
        assert!(profile.workload(LockKind::Spinlock).is_none());
        assert_eq!(
            profile.workload(LockKind::CoSMutex),
            Some(Workload {
                read: Weight::Tasks,
                write: Weight::Zero
            })
        );
        assert_eq!(profile.default_root(), "noreading");
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("noreading".parse::<Profile>().unwrap(), Profile::NoReading);
        assert_eq!("Contended".parse::<Profile>().unwrap(), Profile::Contended);
        assert!("fast".parse::<Profile>().is_err());
    }
}
