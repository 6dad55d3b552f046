use lorescope::{ArchiveBrowser, BrowseError, Config, FetchError, Fetcher, Navigation};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const INDEX: &str = r#"<html><body><pre>* <a href="netdev/">netdev</a> - Netdev List
* <a href="bpf/">bpf</a> - BPF List
</pre></body></html>"#;

const NEWEST: &str = r#"<html><body><pre><a href="20240401120000-1-kuba@kernel.org/T/#u">[PATCH net-next] tcp: tidy up</a>
` <a href="20240401130000-2-edumazet@google.com/T/#u">Re: [PATCH net-next] tcp: tidy up</a>
<a href="20240401110000-9-horms@kernel.org/T/#u">[PATCH net] ipv6: fix leak</a>
</pre><pre><a href="?t=20240401110000" rel=next>next (older)</a> | <a href="./">latest</a></pre></body></html>"#;

const OLDEST: &str = r#"<html><body><pre><a href="20240331080000-4-davem@davemloft.net/T/#u">pull request: net 2024-03-31</a>
</pre><pre><a href="?t=20240401120000" rel=prev>prev (newer)</a> | <a href="./">latest</a></pre></body></html>"#;

async fn mount_html(server: &MockServer, route: &str, body: &'static str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.as_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn browser_for(server: &MockServer) -> ArchiveBrowser<Fetcher> {
    let config = Config::new(&server.uri()).unwrap();
    let fetcher = Fetcher::new(&config).unwrap();
    ArchiveBrowser::new(fetcher, config.base_url())
}

#[tokio::test]
async fn test_mailing_lists_from_index() {
    let server = MockServer::start().await;
    mount_html(&server, "/", INDEX).await;

    let lists = browser_for(&server).mailing_lists().await.unwrap();
    let names: Vec<_> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["bpf", "netdev"]);
    assert_eq!(lists[1].description, "Netdev List");
    assert!(lists.iter().all(|l| l.messages.is_empty()));
}

#[tokio::test]
async fn test_open_and_page_back_to_the_end() {
    let server = MockServer::start().await;
    mount_html(&server, "/netdev", NEWEST).await;
    Mock::given(method("GET"))
        .and(path("/netdev/"))
        .and(query_param("t", "20240401110000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(OLDEST.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&server)
        .await;

    let browser = browser_for(&server);

    let opened = browser.open("netdev").await.unwrap();
    assert_eq!(opened.page.len(), 3);
    assert_eq!(opened.page.roots, [0, 2]);
    assert_eq!(opened.page.messages[0].replies, [1]);
    assert_eq!(
        opened.page.messages[0].message_id,
        format!("{}/netdev/20240401120000-1-kuba@kernel.org", server.uri())
    );
    assert!(!opened.end_reached);

    let older = browser.older("netdev").await.unwrap();
    assert_eq!(older.page.len(), 1);
    assert_eq!(older.page.messages[0].seq_id, 3);
    assert_eq!(older.page.messages[0].subject, "pull request: net 2024-03-31");
    assert!(older.end_reached);

    let err = browser.older("netdev").await.unwrap_err();
    assert!(matches!(
        err,
        BrowseError::NoCursor {
            direction: Navigation::Older,
            ..
        }
    ));
    assert_eq!(browser.snapshot("netdev").await, Some(older));
}

#[tokio::test]
async fn test_unknown_list_surfaces_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/no-such-list"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let browser = browser_for(&server);
    let err = browser.open("no-such-list").await.unwrap_err();

    match err {
        BrowseError::Fetch(fetch @ FetchError::Http { .. }) => assert!(fetch.is_not_found()),
        other => panic!("Expected HTTP 404, got {other:?}"),
    }
    assert_eq!(browser.snapshot("no-such-list").await, None);
}
