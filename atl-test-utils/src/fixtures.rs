//! Canned API payloads shaped like real Jira and Confluence responses

use serde_json::{Value, json};

/// A fully-populated Jira issue
pub fn jira_issue() -> Value {
  json!({
      "id": "10000",
      "key": "TEST-123",
      "self": "https://jira.example.com/rest/api/2/issue/10000",
      "fields": {
          "summary": "Login page rejects valid passwords",
          "description": "Steps to reproduce:\n1. Open login\n2. Enter valid password",
          "status": { "name": "In Progress" },
          "priority": { "name": "High" },
          "assignee": {
              "displayName": "Ada Lovelace",
              "emailAddress": "ada@example.com",
              "accountId": "5b10a2844c20165700ede21g"
          },
          "reporter": { "displayName": "Grace Hopper" },
          "project": { "key": "TEST", "name": "Test Project" },
          "issuetype": { "name": "Bug" },
          "customfield_10106": 5.0
      }
  })
}

/// A search result with one assigned and one unassigned issue
pub fn jira_search_result() -> Value {
  json!({
      "startAt": 0,
      "maxResults": 50,
      "total": 2,
      "issues": [
          {
              "key": "TEST-1",
              "fields": {
                  "summary": "First issue",
                  "status": { "name": "To Do" },
                  "priority": { "name": "Medium" },
                  "assignee": { "displayName": "Ada Lovelace" },
                  "customfield_10106": 3.0
              }
          },
          {
              "key": "TEST-2",
              "fields": {
                  "summary": "Second issue",
                  "status": { "name": "Done" },
                  "priority": { "name": "Low" },
                  "assignee": null
              }
          }
      ]
  })
}

/// The transition list used throughout the matching tests
pub fn jira_transitions() -> Value {
  json!({
      "transitions": [
          { "id": "11", "name": "In Progress", "to": { "name": "In Progress" } },
          { "id": "21", "name": "Done", "to": { "name": "Done" } }
      ]
  })
}

/// A user search result for a cloud deployment
pub fn jira_users() -> Value {
  json!([
      {
          "accountId": "5b10a2844c20165700ede21g",
          "name": "ada",
          "displayName": "Ada Lovelace",
          "emailAddress": "ada@example.com",
          "active": true
      },
      {
          "accountId": "5b10ac8d82e05b22cc7d4ef5",
          "name": "ada.l",
          "displayName": "Ada L.",
          "active": false
      }
  ])
}

/// A Confluence page at the given version, with storage body
pub fn confluence_page(version: u64) -> Value {
  json!({
      "id": "123456",
      "type": "page",
      "status": "current",
      "title": "Release Notes",
      "space": { "id": 98304, "key": "ENG", "name": "Engineering", "type": "global" },
      "version": {
          "number": version,
          "by": { "type": "known", "username": "ada", "displayName": "Ada Lovelace" },
          "when": "2024-03-01T10:15:00.000Z",
          "message": "",
          "minorEdit": false
      },
      "body": {
          "storage": { "value": "<p>Hello</p>", "representation": "storage" }
      },
      "_links": {
          "webui": "/display/ENG/Release+Notes",
          "edit": "/pages/resumedraft.action?draftId=123456",
          "self": "https://wiki.example.com/rest/api/content/123456"
      }
  })
}
