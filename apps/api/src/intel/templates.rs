// Outreach message templates, one per wedge family.
// Placeholders are replaced verbatim by `render_outreach`. No generation step.

use crate::intel::wedge::WedgeFamily;

pub const PAIN_POINT_TEMPLATE: &str = "Hi {first_name},

Your recent post about {theme} caught my eye - {engagement} people engaging tells me you're not the only one feeling it.

We work with teams like {company} to take the friction out of {theme}, and as {title} you're probably closest to the cost of it.

Open to comparing notes for 15 minutes next week?";

pub const BUYING_SIGNAL_TEMPLATE: &str = "Hi {first_name},

Saw that you're looking for {intent}. Rather than another pitch, happy to share what teams similar to {company} shortlisted and why.

If it's useful, I can send a one-page comparison before you talk to anyone.";

pub const JOB_CHANGE_TEMPLATE: &str = "Hi {first_name},

Congrats on the {title} role at {company}! {tenure_months} months in is usually when the first round of process and tooling decisions lands.

We've helped a few leaders in the same spot get early wins on the board. Worth a short call?";

pub const THOUGHT_LEADERSHIP_TEMPLATE: &str = "Hi {first_name},

I've been following your posts - the one on {theme} ({engagement} engagements) was a standout.

We're seeing similar patterns across teams like {company} and I'd value your take on what we're building.";

pub const ACTIVE_POSTER_TEMPLATE: &str = "Hi {first_name},

I've been reading your posts on {topics} - {post_count} recent posts is a lot of signal on where your head is at.

We're working with teams like {company} on exactly those areas. Would you be up for trading notes sometime?";

pub const TECHNICAL_TEMPLATE: &str = "Hi {first_name},

Noticed your {language} work on GitHub alongside your posts on integrations. Figured you'd prefer the technical version: we expose everything through an API and you can be running in an afternoon.

Happy to send docs or walk through the architecture with your team at {company}.";

pub const GENERAL_TEMPLATE: &str = "Hi {first_name},

{wedge} - that caught my attention. Teams at companies like {company} often use moments like this to revisit how they work.

As {title}, would you be open to a quick conversation?";

/// Values substituted into a template. Missing contact fields get neutral fallbacks.
#[derive(Debug, Clone, Default)]
pub struct OutreachVars {
    pub first_name: String,
    pub company: String,
    pub title: String,
    pub theme: String,
    pub engagement: String,
    pub intent: String,
    pub tenure_months: String,
    pub language: String,
    pub topics: String,
    pub post_count: String,
    pub wedge: String,
}

pub fn template_for(family: WedgeFamily) -> &'static str {
    match family {
        WedgeFamily::PainPoint => PAIN_POINT_TEMPLATE,
        WedgeFamily::BuyingSignal => BUYING_SIGNAL_TEMPLATE,
        WedgeFamily::JobChange => JOB_CHANGE_TEMPLATE,
        WedgeFamily::ThoughtLeadership => THOUGHT_LEADERSHIP_TEMPLATE,
        WedgeFamily::ActivePoster => ACTIVE_POSTER_TEMPLATE,
        WedgeFamily::Technical => TECHNICAL_TEMPLATE,
        WedgeFamily::General => GENERAL_TEMPLATE,
    }
}

pub fn render_outreach(template: &str, vars: &OutreachVars) -> String {
    template
        .replace("{first_name}", &vars.first_name)
        .replace("{company}", &vars.company)
        .replace("{title}", &vars.title)
        .replace("{theme}", &vars.theme)
        .replace("{engagement}", &vars.engagement)
        .replace("{intent}", &vars.intent)
        .replace("{tenure_months}", &vars.tenure_months)
        .replace("{language}", &vars.language)
        .replace("{topics}", &vars.topics)
        .replace("{post_count}", &vars.post_count)
        .replace("{wedge}", &vars.wedge)
}
