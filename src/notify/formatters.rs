use crate::listing::{AdoptionListing, JobListing, Listing};

/// Message body sent to the user for a newly found listing
pub fn message_body(listing: &Listing) -> String {
    match listing {
        Listing::Adoption(dog) => adoption_message(dog),
        Listing::Job(job) => job_message(job),
    }
}

fn adoption_message(dog: &AdoptionListing) -> String {
    format!(
        "New dog match at {}!\nName: {}\nBreed: {}\nLink: {}",
        dog.source, dog.name, dog.breed, dog.url
    )
}

fn job_message(job: &JobListing) -> String {
    format!("New job posting!\n{}", job.description())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adoption_message() {
        let dog = Listing::Adoption(AdoptionListing {
            source: "Rancho Coastal Humane Society".to_string(),
            name: "Peanut".to_string(),
            breed: "Poodle".to_string(),
            sex: "female".to_string(),
            age: "1 year".to_string(),
            weight: "12 lbs".to_string(),
            image: None,
            url: "https://rchumanesociety.org/dogs-for-adoption/".to_string(),
        });

        assert_eq!(
            message_body(&dog),
            "New dog match at Rancho Coastal Humane Society!\n\
             Name: Peanut\n\
             Breed: Poodle\n\
             Link: https://rchumanesociety.org/dogs-for-adoption/"
        );
    }

    #[test]
    fn test_job_message_includes_req_id() {
        let job = Listing::Job(JobListing {
            employer: "Viasat".to_string(),
            title: "Software Engineer".to_string(),
            req_id: "R123".to_string(),
            url: "https://careers.viasat.com/jobs/R123".to_string(),
            qualifications: vec!["Rust".to_string()],
        });

        let body = message_body(&job);
        assert!(body.starts_with("New job posting!\nViasat: Software Engineer"));
        assert!(body.contains("Req ID: R123"));
        assert!(body.contains("  - Rust"));
    }
}
