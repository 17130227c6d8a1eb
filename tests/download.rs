// CLASSIFICATION: COMMUNITY
// Filename: tests/download.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-08-12

//! Container download against a local HTTP origin.

use std::fs;
use std::thread;
use tiny_http::{Response, Server};
use update365::net::download;

fn serve_one(response: Response<std::io::Cursor<Vec<u8>>>) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let url = format!("http://{}/ENSOUPDAT.PUP", server.server_addr());
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        request.respond(response).unwrap();
    });
    (url, handle)
}

#[test]
fn download_writes_the_body_to_the_destination() {
    let body: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let (url, handle) = serve_one(Response::from_data(body.clone()));

    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("ENSOUPDAT.PUP");
    download(&url, &dst).unwrap();
    handle.join().unwrap();

    assert_eq!(fs::read(&dst).unwrap(), body);
}

#[test]
fn missing_resource_is_an_error() {
    let (url, handle) = serve_one(Response::from_data(b"not found".to_vec()).with_status_code(404));

    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("ENSOUPDAT.PUP");
    assert!(download(&url, &dst).is_err());
    handle.join().unwrap();
}
