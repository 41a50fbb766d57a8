//! Built-in clause library.
//!
//! Covers the five contract types shipped by default, all for the INDIA
//! jurisdiction. Reference texts are representative best-practice language,
//! kept short since they only feed the similarity comparison.

use std::collections::HashMap;
use std::sync::Arc;

use super::{ClauseTemplate, StandardClauseSet};

fn template(label: &str, reference_text: &str) -> ClauseTemplate {
    ClauseTemplate {
        label: label.to_string(),
        reference_text: reference_text.to_string(),
    }
}

fn set(
    critical: &[(&str, &str)],
    important: &[(&str, &str)],
    optional: &[(&str, &str)],
) -> Arc<StandardClauseSet> {
    Arc::new(StandardClauseSet {
        critical: critical.iter().map(|(l, r)| template(l, r)).collect(),
        important: important.iter().map(|(l, r)| template(l, r)).collect(),
        optional: optional.iter().map(|(l, r)| template(l, r)).collect(),
    })
}

/// The default clause library, keyed `CONTRACT_TYPE_JURISDICTION`.
pub fn builtin_sets() -> HashMap<String, Arc<StandardClauseSet>> {
    let mut sets = HashMap::new();

    sets.insert(
        "SERVICE_AGREEMENT_INDIA".to_string(),
        set(
            &[
                ("Scope of Services", "Detailed description of the services to be performed, deliverables, and acceptance criteria."),
                ("Payment Terms", "Fees, invoicing schedule, payment due dates, and consequences of late payment."),
                ("Term and Termination", "Duration of the agreement and the conditions under which either party may terminate it."),
                ("Confidentiality", "Obligation of both parties to protect confidential information disclosed during the engagement."),
                ("Intellectual Property Rights", "Ownership and licensing of intellectual property created or used under the agreement."),
                ("Liability Limitation", "Cap on each party's liability and exclusion of indirect or consequential damages."),
            ],
            &[
                ("Service Level Agreement (SLA)", "Measurable service levels, response times, and remedies for failing to meet them."),
                ("Insurance Requirements", "Insurance coverage each party must maintain for the duration of the services."),
                ("Dispute Resolution", "Procedure for resolving disputes through negotiation, mediation, or arbitration before litigation."),
                ("Amendment Procedures", "How the agreement may be amended, requiring written consent of both parties."),
                ("Data Protection and Security", "Handling, storage, and protection of personal and business data processed under the agreement."),
            ],
            &[
                ("Renewal Terms", "Conditions for renewal or extension of the agreement at the end of the term."),
                ("Compliance Requirements", "Obligation to comply with applicable laws, regulations, and industry standards."),
                ("Performance Metrics", "Key performance indicators used to evaluate the quality of the services."),
            ],
        ),
    );

    sets.insert(
        "EMPLOYMENT_INDIA".to_string(),
        set(
            &[
                ("Job Title and Responsibilities", "The employee's position, reporting line, and primary duties and responsibilities."),
                ("Compensation and Benefits", "Salary, allowances, bonuses, and benefits payable to the employee."),
                ("Working Hours", "Normal working hours, overtime expectations, and workplace location."),
                ("Termination Clause", "Grounds and procedure for termination of employment by either party."),
                ("Confidentiality", "Employee's obligation to keep employer information confidential during and after employment."),
                ("Non-Compete Agreement", "Restrictions on the employee joining competitors or soliciting clients after leaving."),
            ],
            &[
                ("Leave Policy", "Annual leave, sick leave, and other leave entitlements and how they accrue."),
                ("Performance Management", "How the employee's performance will be reviewed and appraised."),
                ("Dispute Resolution", "Procedure for resolving employment disputes, including escalation and arbitration."),
                ("Tax and Compliance", "Tax withholding, statutory deductions, and compliance with labour law."),
                ("Notice Period", "Notice each party must give before ending the employment relationship."),
            ],
            &[
                ("Career Development", "Opportunities for promotion and professional growth within the organisation."),
                ("Training and Development", "Training the employer will provide and any bond or reimbursement terms."),
                ("Grievance Redressal", "Internal mechanism for the employee to raise and resolve grievances."),
            ],
        ),
    );

    sets.insert(
        "NDA_INDIA".to_string(),
        set(
            &[
                ("Definition of Confidential Information", "What information is treated as confidential, including form and marking requirements."),
                ("Permitted Disclosures", "Circumstances under which confidential information may be disclosed, such as to advisors or by law."),
                ("Term of Confidentiality", "How long the confidentiality obligations survive after disclosure or termination."),
                ("Return of Information", "Obligation to return or destroy confidential materials when the relationship ends."),
                ("Consequences of Breach", "Remedies and damages available to the disclosing party on breach of the agreement."),
                ("Exceptions to Confidentiality", "Information excluded from protection, such as public or independently developed information."),
            ],
            &[
                ("Jurisdiction and Governing Law", "The governing law of the agreement and the courts with jurisdiction over disputes."),
                ("Severability", "Invalid provisions are severed without affecting the remainder of the agreement."),
                ("Remedies for Breach", "Injunctive relief and other remedies available in addition to damages."),
                ("No License Granted", "Disclosure grants no license or ownership rights in the confidential information."),
            ],
            &[
                ("Insurance", "Insurance coverage maintained against loss arising from unauthorized disclosure."),
                ("Indemnification", "Indemnity for losses caused by a party's breach of its confidentiality obligations."),
                ("Waiver", "Failure to enforce a provision does not waive the right to enforce it later."),
            ],
        ),
    );

    sets.insert(
        "PARTNERSHIP_INDIA".to_string(),
        set(
            &[
                ("Partnership Structure and Rights", "The form of the partnership and each partner's rights and ownership interest."),
                ("Capital Contribution", "Each partner's initial and ongoing capital contributions and how they are valued."),
                ("Profit and Loss Sharing", "How profits and losses are allocated and distributed among the partners."),
                ("Decision Making and Governance", "Voting rights, quorum, and the decisions requiring unanimous or majority consent."),
                ("Dispute Resolution", "Procedure for resolving disputes between partners, including mediation and arbitration."),
                ("Termination and Exit Clause", "How the partnership dissolves and how a partner may exit or be removed."),
            ],
            &[
                ("Liability and Indemnification", "Allocation of liabilities and indemnities between the partners."),
                ("Confidentiality", "Partners' obligation to keep partnership affairs and information confidential."),
                ("Non-Compete", "Restrictions on partners engaging in competing businesses during and after the partnership."),
                ("Amendment Procedures", "How the partnership deed may be amended with the partners' consent."),
            ],
            &[
                ("Succession Planning", "What happens to a partner's interest on death, incapacity, or retirement."),
                ("Buyout Provisions", "Valuation and process for buying out a departing partner's interest."),
                ("Additional Partners", "Conditions for admitting new partners into the partnership."),
            ],
        ),
    );

    sets.insert(
        "VENDOR_AGREEMENT_INDIA".to_string(),
        set(
            &[
                ("Scope of Supplies/Services", "The goods or services to be supplied, including quantities and specifications."),
                ("Quality and Specifications", "Quality standards, specifications, and conformity requirements for the supplies."),
                ("Pricing and Payment Terms", "Unit pricing, invoicing, payment schedule, and taxes applicable to the supply."),
                ("Delivery Schedule", "Delivery timelines, locations, shipping terms, and consequences of late delivery."),
                ("Warranty and Liability", "Warranties for the supplied goods or services and liability for defects."),
                ("Termination Clause", "Grounds and notice requirements for terminating the vendor relationship."),
            ],
            &[
                ("Inspection and Acceptance", "Buyer's right to inspect deliveries and the procedure for acceptance or rejection."),
                ("Returns and Refunds", "Process for returning non-conforming goods and obtaining refunds or replacements."),
                ("Intellectual Property Rights", "Ownership of intellectual property embodied in or created for the supplies."),
                ("Confidentiality", "Vendor's obligation to protect the buyer's confidential business information."),
                ("Insurance", "Insurance coverage the vendor must maintain against product and delivery risks."),
            ],
            &[
                ("Performance Discounts", "Discounts or rebates linked to vendor performance or early payment."),
                ("Volume Commitments", "Minimum purchase volumes and associated pricing commitments."),
                ("Extension Options", "Options to extend the agreement on existing or renegotiated terms."),
            ],
        ),
    );

    sets
}
