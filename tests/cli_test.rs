use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/events.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("member,name,rounds_paid,total,usd"))
        // Round 0 recipient, settled once in round 1
        .stdout(predicate::str::contains("1,Oyin,1,25000,12.50"))
        // Settled in rounds 0 and 1
        .stdout(predicate::str::contains("3,Victor,2,50000,25.00"))
        .stdout(predicate::str::contains("4,Abdul,1,25000,12.50"));

    Ok(())
}

#[test]
fn test_cli_round_reports() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/events.csv").arg("--rounds");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("round,recipient,collected,pool,complete"))
        // All three non-recipients settled round 0
        .stdout(predicate::str::contains("0,Oyin,75000,100000,true"))
        // Members 1 and 3 settled round 1; member 4 still owes
        .stdout(predicate::str::contains("1,Jika,50000,100000,false"))
        .stdout(predicate::str::contains("2,Victor,0,100000,false"))
        .stdout(predicate::str::contains("3,Abdul,0,100000,false"));

    Ok(())
}

#[test]
fn test_cli_custom_btc_price() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/events.csv")
        .arg("--btc-price")
        .arg("100000");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3,Victor,2,50000,50.00"));

    Ok(())
}
