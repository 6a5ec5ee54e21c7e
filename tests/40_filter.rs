mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn list_accepts_the_full_query_pipeline() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;

    let url = server.url("/jobs?jobType=Permanent&salary[gte]=50000&sort=-salary&fields=title,salary&page=1&limit=5");
    let res = reqwest::get(url).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], json!(true));
    let jobs = body["data"].as_array().unwrap();
    assert!(jobs.len() <= 5);
    assert_eq!(body["results"], json!(jobs.len()));
    let salaries: Vec<i64> = jobs.iter().filter_map(|j| j["salary"].as_i64()).collect();
    assert!(salaries.windows(2).all(|w| w[0] >= w[1]));
    assert!(salaries.iter().all(|s| *s >= 50000));
    for job in jobs {
        assert!(job.get("description").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn unknown_fields_are_rejected() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;

    for query in ["colour=red", "sort=password", "salary[regex]=1"] {
        let res = reqwest::get(server.url(&format!("/jobs?{}", query))).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", query);
    }
    Ok(())
}

#[tokio::test]
async fn radius_search_validates_distance() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/jobs/61469/far")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
