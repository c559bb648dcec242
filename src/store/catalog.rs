//! Candidate values the encounter generator samples from.

pub const DIAGNOSES: [&str; 10] = [
    "Essential hypertension",
    "Type 2 diabetes mellitus",
    "Acute upper respiratory infection",
    "Major depressive disorder",
    "Generalized anxiety disorder",
    "Acute bronchitis",
    "Osteoarthritis",
    "Allergic rhinitis",
    "Gastroesophageal reflux disease",
    "Urinary tract infection",
];

pub const TREATMENT_PLANS: [&str; 7] = [
    "Lifestyle modifications and medication",
    "Diet change, exercise, and medication review",
    "Rest, fluids, and antibiotics if bacterial",
    "Cognitive behavioral therapy and medication",
    "Physical therapy and anti-inflammatory medication",
    "Proton pump inhibitor and diet modifications",
    "Antibiotics and increased fluid intake",
];

pub const NOTES: [&str; 7] = [
    "Patient responded well to treatment",
    "Symptoms improving but continue monitoring",
    "Consider referral to specialist if no improvement",
    "Discussed importance of medication adherence",
    "Patient reports side effects from medication",
    "Bloodwork ordered to monitor progress",
    "Patient education provided on condition management",
];

pub const DOSAGES: [&str; 6] = ["10mg", "20mg", "25mg", "50mg", "100mg", "500mg"];

pub const FREQUENCIES: [&str; 6] = [
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Every 8 hours",
    "Every 12 hours",
    "As needed",
];

pub const INSTRUCTIONS: [&str; 7] = [
    "Take with food",
    "Take on an empty stomach",
    "Avoid alcohol",
    "May cause drowsiness",
    "Complete full course of medication",
    "Take at the same time each day",
    "Do not crush or chew tablets",
];
