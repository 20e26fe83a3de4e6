diesel::table! {
    tickets (id) {
        id -> Int4,
        email_id -> Nullable<Varchar>,
        subject -> Varchar,
        body -> Text,
        status -> Varchar,
        facility_id -> Nullable<Int4>,
        contact_id -> Nullable<Int4>,
        sentiment_id -> Nullable<Int4>,
        category_id -> Nullable<Int4>,
        gas_analyzer_id -> Nullable<Int4>,
        created_at -> Timestamptz,
        sentiment_confidence -> Nullable<Float8>,
        category_confidence -> Nullable<Float8>,
        generated_response -> Nullable<Text>,
        response_subject -> Nullable<Varchar>,
        response_method -> Nullable<Varchar>,
    }
}

diesel::table! {
    facilities (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    contacts (id) {
        id -> Int4,
        full_name -> Varchar,
        email -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
    }
}

diesel::table! {
    categories (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    sentiments (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    gas_analyzer_types (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    gas_analyzers (id) {
        id -> Int4,
        serial_number -> Varchar,
        type_id -> Nullable<Int4>,
    }
}

diesel::joinable!(tickets -> facilities (facility_id));
diesel::joinable!(tickets -> contacts (contact_id));
diesel::joinable!(tickets -> categories (category_id));
diesel::joinable!(tickets -> sentiments (sentiment_id));
diesel::joinable!(tickets -> gas_analyzers (gas_analyzer_id));
diesel::joinable!(gas_analyzers -> gas_analyzer_types (type_id));

diesel::allow_tables_to_appear_in_same_query!(
    tickets,
    facilities,
    contacts,
    categories,
    sentiments,
    gas_analyzers,
    gas_analyzer_types,
);
