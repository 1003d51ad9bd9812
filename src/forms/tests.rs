use super::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
struct TestSubmit {
    id: u32,
    prevented: bool,
}

impl TestSubmit {
    fn new(id: u32) -> Self {
        Self {
            id,
            prevented: false,
        }
    }
}

impl SubmitEvent for TestSubmit {
    fn prevent_default(&mut self) {
        self.prevented = true;
    }
}

type Calls = Arc<Mutex<Vec<TestSubmit>>>;

fn recording_form(schema: Arc<Schema>) -> (Form<TestSubmit>, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let form = Form::new(schema, move |ev: TestSubmit| {
        sink.lock().unwrap().push(ev);
    });
    (form, calls)
}

fn signup_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(vec![
            FieldDescriptor::text("name", "Name").required(),
            FieldDescriptor::email("email", "Email").required(),
            FieldDescriptor::password("password", "Password"),
            FieldDescriptor::select("gender", "Gender", ["male", "female"]).required(),
        ])
        .unwrap(),
    )
}

#[test]
fn initial_state_covers_every_descriptor_name() {
    let schema = signup_schema();
    let (form, _) = recording_form(schema.clone());
    let names: HashSet<&str> = form.values().into_iter().map(|(n, _)| n).collect();
    let expected: HashSet<&str> = schema.fields().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, expected);
    assert!(form.field("missing").is_none());
}

#[test]
fn initial_values_depend_on_kind() {
    let (form, _) = recording_form(signup_schema());
    assert_eq!(form.value("name"), Some(""));
    assert_eq!(form.value("email"), Some(""));
    assert_eq!(form.value("password"), Some(""));
    assert_eq!(form.value("gender"), None);
    assert!(form.error().is_none());
    assert!(form.is_submittable());
}

#[test]
fn field_state_copies_descriptor_metadata() {
    let schema = Arc::new(
        Schema::new(vec![FieldDescriptor::select("color", "Color", ["red", "blue"])
            .required()
            .placeholder("Pick one")])
        .unwrap(),
    );
    let (form, _) = recording_form(schema);
    let st = form.field("color").unwrap();
    assert_eq!(st.label, "Color");
    assert!(st.required);
    assert_eq!(st.placeholder.as_deref(), Some("Pick one"));
    assert_eq!(st.kind.options(), ["red".to_string(), "blue".to_string()]);
}

#[test]
fn on_change_touches_only_the_named_field() {
    let (mut form, _) = recording_form(signup_schema());
    form.on_change("email", Some("a@b.com".into())).unwrap();
    form.on_change("name", Some("Ann".into())).unwrap();
    form.on_change("name", Some("Anna".into())).unwrap();
    assert_eq!(form.value("name"), Some("Anna"));
    assert_eq!(form.value("email"), Some("a@b.com"));
    assert_eq!(form.value("password"), Some(""));
    assert_eq!(form.value("gender"), None);
}

#[test]
fn on_change_with_none_keeps_text_fields_as_strings() {
    let (mut form, _) = recording_form(signup_schema());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.on_change("name", None).unwrap();
    assert_eq!(form.value("name"), Some(""));

    form.on_change("gender", Some("female".into())).unwrap();
    assert_eq!(form.value("gender"), Some("female"));
    form.on_change("gender", None).unwrap();
    assert_eq!(form.value("gender"), None);
}

#[test]
fn on_change_rejects_unknown_field() {
    let (mut form, _) = recording_form(signup_schema());
    let rev = form.revision();
    let err = form.on_change("nope", Some("x".into())).unwrap_err();
    assert_eq!(err, FormError::UnknownField("nope".into()));
    assert_eq!(form.revision(), rev);
}

#[test]
fn on_change_does_not_validate() {
    let (mut form, calls) = recording_form(signup_schema());
    form.on_change("name", Some(String::new())).unwrap();
    assert!(form.error().is_none());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn empty_required_text_blocks_submit() {
    let schema = Arc::new(Schema::new(vec![FieldDescriptor::text("name", "Name").required()]).unwrap());
    let (mut form, calls) = recording_form(schema);
    let err = form.submit(TestSubmit::new(1)).unwrap_err();
    assert_eq!(err.field(), "name");
    assert_eq!(form.error(), Some(&err));
    assert!(!form.is_submittable());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn satisfied_form_invokes_handler_once_with_event() {
    let schema = Arc::new(Schema::new(vec![FieldDescriptor::text("name", "Name").required()]).unwrap());
    let (mut form, calls) = recording_form(schema);
    form.on_change("name", Some("Ann".into())).unwrap();
    form.submit(TestSubmit::new(7)).unwrap();
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, 7);
    assert!(calls[0].prevented);
    assert!(form.error().is_none());
}

#[test]
fn rejected_submit_still_prevents_default() {
    struct Flag(Arc<Mutex<bool>>);
    impl SubmitEvent for Flag {
        fn prevent_default(&mut self) {
            *self.0.lock().unwrap() = true;
        }
    }
    let prevented = Arc::new(Mutex::new(false));
    let schema = Arc::new(Schema::new(vec![FieldDescriptor::text("name", "Name").required()]).unwrap());
    let mut form: Form<Flag> = Form::new(schema, |_| {});
    assert!(form.submit(Flag(prevented.clone())).is_err());
    assert!(*prevented.lock().unwrap());
}

#[test]
fn first_failing_field_in_schema_order_is_reported() {
    let (mut form, _) = recording_form(signup_schema());
    let err = form.submit(TestSubmit::new(1)).unwrap_err();
    assert_eq!(err.field(), "name");

    form.on_change("name", Some("Ann".into())).unwrap();
    let err = form.submit(TestSubmit::new(2)).unwrap_err();
    assert_eq!(err.field(), "email");
}

#[test]
fn required_select_needs_a_choice() {
    let (mut form, calls) = recording_form(signup_schema());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.on_change("email", Some("a@b.com".into())).unwrap();
    let err = form.submit(TestSubmit::new(1)).unwrap_err();
    assert_eq!(err.field(), "gender");

    form.on_change("gender", Some("female".into())).unwrap();
    form.submit(TestSubmit::new(2)).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn optional_fields_never_block() {
    let schema = Arc::new(
        Schema::new(vec![
            FieldDescriptor::password("password", "Password"),
            FieldDescriptor::select("gender", "Gender", ["male"]),
        ])
        .unwrap(),
    );
    let (mut form, calls) = recording_form(schema);
    form.submit(TestSubmit::new(1)).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn whitespace_only_text_satisfies_required() {
    let schema = Arc::new(Schema::new(vec![FieldDescriptor::text("name", "Name").required()]).unwrap());
    let (mut form, calls) = recording_form(schema);
    form.on_change("name", Some("   ".into())).unwrap();
    assert!(form.submit(TestSubmit::new(1)).is_ok());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn successful_submit_clears_previous_error() {
    let schema = Arc::new(Schema::new(vec![FieldDescriptor::text("name", "Name").required()]).unwrap());
    let (mut form, _) = recording_form(schema);
    assert!(form.submit(TestSubmit::new(1)).is_err());
    assert!(!form.is_submittable());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.submit(TestSubmit::new(2)).unwrap();
    assert!(form.error().is_none());
    assert!(form.is_submittable());
}

#[test]
fn error_message_names_the_field() {
    let err = ValidationError::Required {
        field: "email".into(),
    };
    assert_eq!(
        err.to_string(),
        "Error: form is not valid. Field \"email\" is required"
    );
}

#[test]
fn clear_resets_values_but_keeps_metadata_and_error() {
    let (mut form, _) = recording_form(signup_schema());
    assert!(form.submit(TestSubmit::new(1)).is_err());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.on_change("password", Some("hunter2".into())).unwrap();
    form.on_change("gender", Some("male".into())).unwrap();

    form.clear();

    assert_eq!(form.value("name"), Some(""));
    assert_eq!(form.value("password"), Some(""));
    assert_eq!(form.value("gender"), None);
    let gender = form.field("gender").unwrap();
    assert!(gender.required);
    assert_eq!(gender.label, "Gender");
    assert_eq!(gender.kind.options().len(), 2);
    assert_eq!(form.error().map(|e| e.field()), Some("name"));
}

#[test]
fn walkthrough_name_then_email() {
    let schema = Arc::new(
        Schema::new(vec![
            FieldDescriptor::text("name", "Name").required(),
            FieldDescriptor::email("email", "Email").required(),
        ])
        .unwrap(),
    );
    let (mut form, calls) = recording_form(schema);
    form.on_change("name", Some("Ann".into())).unwrap();

    let err = form.submit(TestSubmit::new(1)).unwrap_err();
    assert_eq!(
        form.error().map(ToString::to_string).as_deref(),
        Some("Error: form is not valid. Field \"email\" is required")
    );
    assert_eq!(err.field(), "email");
    assert!(calls.lock().unwrap().is_empty());

    form.on_change("email", Some("a@b.com".into())).unwrap();
    form.submit(TestSubmit::new(2)).unwrap();
    assert!(form.error().is_none());
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, 2);
}

#[test]
fn new_schema_resets_all_values() {
    let (mut form, _) = recording_form(signup_schema());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.on_change("gender", Some("male".into())).unwrap();

    let mut fields = signup_schema().fields().to_vec();
    fields.push(FieldDescriptor::text("city", "City"));
    form.set_schema(Arc::new(Schema::new(fields).unwrap()));

    assert_eq!(form.value("name"), Some(""));
    assert_eq!(form.value("gender"), None);
    assert_eq!(form.value("city"), Some(""));
    assert_eq!(form.values().len(), 5);
}

#[test]
fn same_schema_arc_is_a_noop() {
    let schema = signup_schema();
    let (mut form, _) = recording_form(schema.clone());
    form.on_change("name", Some("Ann".into())).unwrap();
    let rev = form.revision();
    form.set_schema(schema);
    assert_eq!(form.value("name"), Some("Ann"));
    assert_eq!(form.revision(), rev);
}

#[test]
fn equal_but_distinct_schema_still_resets() {
    let (mut form, _) = recording_form(signup_schema());
    form.on_change("name", Some("Ann".into())).unwrap();
    form.set_schema(signup_schema());
    assert_eq!(form.value("name"), Some(""));
}

#[test]
fn max_caps_text_input_only() {
    let d = FieldDescriptor::text("code", "Code").max(3);
    assert!(d.accepts_more("ab"));
    assert!(!d.accepts_more("abc"));
    assert!(!d.accepts_more("äbc"));
    assert!(FieldDescriptor::text("free", "Free").accepts_more(&"x".repeat(500)));
    let yaml = "name: code\nlabel: Code\ntype: text\nmax: 4\n";
    let parsed: FieldDescriptor = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(parsed.max, Some(4));
}

#[test]
fn values_follow_schema_order() {
    let (form, _) = recording_form(signup_schema());
    let names: Vec<&str> = form.values().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["name", "email", "password", "gender"]);
}

#[test]
fn listeners_see_every_mutation() {
    let (mut form, _) = recording_form(signup_schema());
    let seen: Arc<Mutex<Vec<FormEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    form.subscribe(move |ev| sink.lock().unwrap().push(ev.clone()));

    form.on_change("name", Some("Ann".into())).unwrap();
    let _ = form.submit(TestSubmit::new(1));
    form.clear();
    form.set_schema(signup_schema());

    let events = seen.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            FormEvent::ValueChanged {
                name: "name".into()
            },
            FormEvent::ErrorChanged {
                error: Some(ValidationError::Required {
                    field: "email".into()
                })
            },
            FormEvent::Cleared,
            FormEvent::SchemaReset,
        ]
    );

}

#[test]
fn repeated_identical_failure_notifies_once() {
    let (mut form, _) = recording_form(signup_schema());
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    form.subscribe(move |ev| {
        if matches!(ev, FormEvent::ErrorChanged { .. }) {
            *sink.lock().unwrap() += 1;
        }
    });
    let _ = form.submit(TestSubmit::new(1));
    let _ = form.submit(TestSubmit::new(2));
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn schema_rejects_duplicate_names() {
    let err = Schema::new(vec![
        FieldDescriptor::text("name", "Name"),
        FieldDescriptor::email("name", "Email"),
    ])
    .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateField("name".into()));
}

#[test]
fn schema_rejects_select_without_options() {
    let err = Schema::new(vec![FieldDescriptor::select(
        "gender",
        "Gender",
        Vec::<String>::new(),
    )])
    .unwrap_err();
    assert_eq!(err, SchemaError::EmptyOptions("gender".into()));
}

#[test]
fn descriptors_deserialize_from_yaml() {
    let yaml = r#"
- name: name
  label: Name
  type: text
  required: true
  placeholder: Enter...
- name: gender
  label: Gender
  type: select
  options: [male, female]
"#;
    let fields: Vec<FieldDescriptor> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(fields[0].kind, FieldKind::Text);
    assert!(fields[0].required);
    assert_eq!(fields[0].placeholder.as_deref(), Some("Enter..."));
    assert_eq!(
        fields[1].kind,
        FieldKind::Select {
            options: vec!["male".into(), "female".into()]
        }
    );
    assert!(!fields[1].required);
}
