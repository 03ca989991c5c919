//! Replays the bundled demo script end to end.

use std::path::Path;

use splitter_ledger::prelude::{Address, SplitterConfig};
use splitter_node::{run_script, Script};

#[tokio::test]
async fn test_demo_script_replay() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scripts/demo.json");
    let script = Script::load(&path).unwrap();

    let summary = run_script(&script, SplitterConfig::default()).await.unwrap();

    let oks: Vec<bool> = summary.outcomes.iter().map(|o| o.ok).collect();
    assert_eq!(
        oks,
        vec![true, true, true, true, true, false, false, false, true, false, true, true]
    );
    assert!(!summary.paused);
    assert!(summary.balances.is_empty());
    assert_eq!(summary.custody, "0");

    let recipients: Vec<Address> = summary.payouts.iter().map(|p| p.recipient).collect();
    assert_eq!(
        recipients,
        vec![Address::repeat_byte(0xbb), Address::repeat_byte(0xcc)]
    );
    assert_eq!(summary.stats.splits_executed, 1);
    assert_eq!(summary.stats.rejected_calls, 4);
}
