mod common;

#[tokio::test]
async fn chat_walks_through_a_document_draft() {
    let app = common::spawn_app().await;

    let reply = app
        .chat("asha", "Can you help me draft a police complaint?")
        .await;
    assert!(reply.starts_with("Let's prepare your Police Complaint."));
    assert!(reply.ends_with("What is your full name?"));

    let answers = [
        ("Asha Rao", "What is your residential address?"),
        ("4 Lake View, Bhopal", "Which police station should the complaint go to?"),
        ("TT Nagar Police Station", "On what date did the incident happen?"),
        (
            "2 October 2026",
            "Describe what happened, including place, people involved and any loss suffered.",
        ),
    ];
    for (answer, next_question) in answers {
        assert_eq!(app.chat("asha", answer).await, next_question);
    }

    let reply = app
        .chat("asha", "My purse was snatched near the bus stand.")
        .await;
    assert!(reply.starts_with("Your Police Complaint is ready."));

    let url = reply.rsplit(' ').next().unwrap();
    assert!(url.starts_with(&format!("{}/generated_documents/police_complaint_", app.address)));
    let download = app.client.get(url).send().await.unwrap();
    assert_eq!(200, download.status().as_u16());

    // back to normal answers once the draft is done
    let reply = app.chat("asha", "Thank you").await;
    assert!(reply.starts_with("This is a mock response to: 'Thank you'"));
}

#[tokio::test]
async fn draft_can_be_cancelled() {
    let app = common::spawn_app().await;

    app.chat("ravi", "I want to write an RTI application").await;
    let reply = app.chat("ravi", "cancel").await;

    assert_eq!(
        reply,
        "Okay, I have cancelled the RTI Application. How else can I help you?"
    );
    assert!(app
        .chat("ravi", "What is the RTI fee?")
        .await
        .starts_with("This is a mock response"));
}

#[tokio::test]
async fn new_chat_abandons_the_draft() {
    let app = common::spawn_app().await;

    app.chat("ravi", "Please prepare a caste certificate application")
        .await;
    app.post_json("/chat/new", &serde_json::json!({"user_id": "ravi"}))
        .await;

    let reply = app.chat("ravi", "Ravi Kumar").await;
    assert!(reply.starts_with("This is a mock response to: 'Ravi Kumar'"));
}
