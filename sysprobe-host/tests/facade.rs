use sysprobe::metrics::{Collected, Domain, ReportRequest, Request, SortKey};
use sysprobe::CollectError;
use sysprobe_devkit::harness::process;
use sysprobe_devkit::{FixtureHost, TestHarness};

#[test]
fn test_collect_matches_requested_domain() {
    let harness = TestHarness::new();
    for domain in Domain::ALL {
        let collected = harness.collector.collect(&Request::new(domain)).unwrap();
        assert_eq!(collected.domain(), domain);
    }
}

#[test]
fn test_disk_filter_is_substring_subset() {
    let harness = TestHarness::new();
    let all = harness.collector.disks(None);
    assert_eq!(all.len(), 3);

    for filter in ["/", "/home", "mnt", "nowhere"] {
        let filtered = harness.collector.disks(Some(filter));
        assert!(filtered.iter().all(|d| d.mount_point.contains(filter)));
        assert!(filtered.iter().all(|d| all.contains(d)));
        let expected = all.iter().filter(|d| d.mount_point.contains(filter)).count();
        assert_eq!(filtered.len(), expected);
    }

    assert_eq!(harness.collector.disks(Some("")), all);
}

#[test]
fn test_disk_request_applies_filter() {
    let harness = TestHarness::new();
    let request = Request::new(Domain::Disk).with_mount_filter("/home");
    match harness.collector.collect(&request).unwrap() {
        Collected::Disks(disks) => {
            assert_eq!(disks.len(), 1);
            assert_eq!(disks[0].filesystem, "/dev/sda2");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_top_processes_by_cpu() {
    let harness = TestHarness::new();
    let top = harness.collector.top_processes(SortKey::Cpu, 3).unwrap();

    let pids: Vec<u32> = top.iter().map(|p| p.pid).collect();
    // postgres and rustc tie at 35%; enumeration order breaks the tie
    assert_eq!(pids, vec![1203, 412, 1204]);
}

#[test]
fn test_top_processes_by_memory() {
    let harness = TestHarness::new();
    let top = harness.collector.top_processes(SortKey::Memory, 10).unwrap();

    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].memory_mb >= w[1].memory_mb));
    assert_eq!(top[0].name, "rustc");
}

#[test]
fn test_limit_larger_than_process_count() {
    let mut host = FixtureHost::sample();
    host.processes = vec![process(10, "a", 1.0, 1.0), process(11, "b", 2.0, 2.0)];
    let harness = TestHarness::with_host(host);

    let top = harness.collector.top_processes(SortKey::Cpu, 50).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].pid, 11);
}

#[test]
fn test_zero_limit_rejected() {
    let harness = TestHarness::new();
    let request = Request::new(Domain::Process).with_processes(SortKey::Memory, 0);
    assert!(matches!(
        harness.collector.collect(&request),
        Err(CollectError::InvalidLimit)
    ));
    // Rejected before the host is asked for anything
    assert_eq!(harness.host.call_count(), 0);
}

#[test]
fn test_unknown_sort_key_rejected() {
    assert!(matches!(
        "name".parse::<SortKey>(),
        Err(CollectError::InvalidSortKey(key)) if key == "name"
    ));
}

#[test]
fn test_collections_are_idempotent() {
    let harness = TestHarness::new();
    for domain in Domain::ALL {
        harness.assert_idempotent(&Request::new(domain));
    }
}

#[tokio::test]
async fn test_report_collects_every_domain() {
    let harness = TestHarness::new();
    let request = ReportRequest::default()
        .with_mount_filter("/home")
        .with_processes(SortKey::Memory, 2);

    let report = harness.collector.report(&request).await.unwrap();

    assert_eq!(report.os.hostname, "fixture-01");
    assert_eq!(report.memory.total_gb, 16.0);
    assert_eq!(report.disk.len(), 1);
    assert_eq!(report.network.len(), 3);
    let pids: Vec<u32> = report.process.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1204, 1203]);
    assert_eq!(harness.host.call_count(), 6);

    let sections: Vec<Domain> = report.sections().iter().map(Collected::domain).collect();
    assert_eq!(sections, Domain::ALL.to_vec());
}

#[tokio::test]
async fn test_report_propagates_memory_failure() {
    let harness = TestHarness::with_host(FixtureHost::sample().without_memory());
    let result = harness.collector.report(&ReportRequest::default()).await;
    assert!(matches!(result, Err(CollectError::MemoryStats(_))));
}

#[tokio::test]
async fn test_report_zero_limit_rejected_before_collection() {
    let harness = TestHarness::new();
    let request = ReportRequest::default().with_processes(SortKey::Cpu, 0);

    let result = harness.collector.report(&request).await;
    assert!(matches!(result, Err(CollectError::InvalidLimit)));
    assert_eq!(harness.host.call_count(), 0);
}
